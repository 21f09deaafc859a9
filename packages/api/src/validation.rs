//! # Validation engine — field rules for users and secrets
//!
//! Every create and update passes through this module before the store is
//! touched. The rules are plain functions over a candidate form plus the facts
//! they need from persisted state, so they can be tested without a store:
//!
//! - [`validate_user`] takes `email_owner`, the id of the persisted user that
//!   currently holds the candidate's email (if any).
//! - [`validate_secret`] takes `author_exists`.
//!
//! [`Validator`] reads those facts from a [`Store`] snapshot and calls the rules.
//! A rejection carries every violated rule, never just the first one.
//!
//! ## Bounds
//!
//! | Field | Min | Max |
//! |-------|-----|-----|
//! | `name` | 3 | 16 |
//! | `password` (when set) | 6 | 16 |
//! | `title` | 4 | 24 |
//! | `body` | 4 | 140 |
//!
//! Bounds are inclusive and count characters, not bytes.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use store::Store;
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;

pub const NAME_LENGTH: RangeInclusive<usize> = 3..=16;
pub const PASSWORD_LENGTH: RangeInclusive<usize> = 6..=16;
pub const TITLE_LENGTH: RangeInclusive<usize> = 4..=24;
pub const BODY_LENGTH: RangeInclusive<usize> = 4..=140;

/// Sign-up or profile form as submitted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    /// Empty means "no password" (or, on update, "keep the current one").
    pub password: String,
    pub password_confirmation: String,
}

impl UserForm {
    /// Form whose confirmation repeats the password.
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        let password = password.into();
        Self {
            name: name.into(),
            email: email.into(),
            password_confirmation: password.clone(),
            password,
        }
    }
}

/// New or edited secret as submitted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretForm {
    pub title: String,
    pub body: String,
}

impl SecretForm {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Name,
    Email,
    Password,
    PasswordConfirmation,
    Title,
    Body,
    Author,
}

impl Field {
    /// Human label used at the start of a form message.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Password => "Password",
            Field::PasswordConfirmation => "Password confirmation",
            Field::Title => "Title",
            Field::Body => "Body",
            Field::Author => "Author",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    Blank,
    TooShort { min: usize },
    TooLong { max: usize },
    Taken,
    Mismatch,
    MustExist,
}

/// One violated rule on one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub rule: Rule,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.field.label();
        match self.rule {
            Rule::Blank => write!(f, "{label} can't be blank"),
            Rule::TooShort { min } => write!(f, "{label} is too short (minimum is {min} characters)"),
            Rule::TooLong { max } => write!(f, "{label} is too long (maximum is {max} characters)"),
            Rule::Taken => write!(f, "{label} has already been taken"),
            Rule::Mismatch => write!(f, "{label} doesn't match Password"),
            Rule::MustExist => write!(f, "{label} must exist"),
        }
    }
}

/// A rejected candidate. Never empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Error)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: Field, rule: Rule) -> Self {
        Self(vec![FieldError { field, rule }])
    }

    fn add(&mut self, field: Field, rule: Rule) {
        self.0.push(FieldError { field, rule });
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether `field` has any violation.
    pub fn has(&self, field: Field) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn contains(&self, field: Field, rule: Rule) -> bool {
        self.0.contains(&FieldError { field, rule })
    }

    /// Messages ready for a form error list.
    pub fn full_messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn check_present(errors: &mut ValidationErrors, field: Field, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, Rule::Blank);
    }
}

fn check_length(errors: &mut ValidationErrors, field: Field, value: &str, bounds: &RangeInclusive<usize>) {
    let len = value.chars().count();
    if len < *bounds.start() {
        errors.add(field, Rule::TooShort { min: *bounds.start() });
    } else if len > *bounds.end() {
        errors.add(field, Rule::TooLong { max: *bounds.end() });
    }
}

/// Check a user candidate.
///
/// `candidate_id` is `None` for a sign-up and the user's own id for an edit;
/// `email_owner` is whoever currently holds `form.email` in the store.
pub fn validate_user(
    candidate_id: Option<Uuid>,
    form: &UserForm,
    email_owner: Option<Uuid>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_present(&mut errors, Field::Name, &form.name);
    check_length(&mut errors, Field::Name, &form.name, &NAME_LENGTH);

    check_present(&mut errors, Field::Email, &form.email);
    if let Some(owner) = email_owner {
        if Some(owner) != candidate_id {
            errors.add(Field::Email, Rule::Taken);
        }
    }

    if !form.password.is_empty() {
        check_length(&mut errors, Field::Password, &form.password, &PASSWORD_LENGTH);
    }
    if form.password_confirmation != form.password {
        errors.add(Field::PasswordConfirmation, Rule::Mismatch);
    }

    errors.into_result()
}

/// Check a secret candidate against whether its author is persisted.
pub fn validate_secret(form: &SecretForm, author_exists: bool) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_present(&mut errors, Field::Title, &form.title);
    check_length(&mut errors, Field::Title, &form.title, &TITLE_LENGTH);

    check_present(&mut errors, Field::Body, &form.body);
    check_length(&mut errors, Field::Body, &form.body, &BODY_LENGTH);

    if !author_exists {
        errors.add(Field::Author, Rule::MustExist);
    }

    errors.into_result()
}

/// Runs the rules against a point-in-time snapshot of a [`Store`].
///
/// The snapshot is not locked: the store's own uniqueness and author checks
/// are the final guard against a concurrent write slipping in between.
pub struct Validator<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> Validator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn user(&self, candidate_id: Option<Uuid>, form: &UserForm) -> Result<(), ApiError> {
        let email_owner = if form.email.trim().is_empty() {
            None
        } else {
            self.store
                .find_user_by_email(&form.email)
                .await?
                .map(|u| u.id)
        };
        validate_user(candidate_id, form, email_owner)?;
        Ok(())
    }

    pub async fn secret(&self, form: &SecretForm, author_id: Option<Uuid>) -> Result<(), ApiError> {
        let author_exists = match author_id {
            Some(id) => self.store.find_user(id).await?.is_some(),
            None => false,
        };
        validate_secret(form, author_exists)?;
        Ok(())
    }
}

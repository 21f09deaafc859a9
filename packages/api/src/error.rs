//! Error taxonomy shared by every flow.

use store::StoreError;
use thiserror::Error;

use crate::policy::Denial;
use crate::routes;
use crate::validation::{Field, Rule, ValidationErrors};

#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more field rules failed; nothing was persisted.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("not authorized: {0}")]
    Unauthorized(Denial),
    /// Sign-in credentials matched no user. Never says which field was wrong.
    #[error("Invalid email or password")]
    Authentication,
    #[error("not found")]
    NotFound,
    #[error("password hashing failed: {0}")]
    Password(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Constraint hits at write time are the same rejection the validator
        // would have produced on a fresher snapshot.
        match err {
            StoreError::DuplicateEmail(_) => {
                ApiError::Validation(ValidationErrors::single(Field::Email, Rule::Taken))
            }
            StoreError::MissingAuthor(_) => {
                ApiError::Validation(ValidationErrors::single(Field::Author, Rule::MustExist))
            }
            other => ApiError::Store(other),
        }
    }
}

impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        ApiError::Unauthorized(denial)
    }
}

impl ApiError {
    /// Where the request layer should send the browser, if anywhere.
    ///
    /// `None` means re-render the submitted form with the errors.
    pub fn redirect_to(&self) -> Option<&'static str> {
        match self {
            ApiError::Unauthorized(denial) => Some(denial.redirect_to()),
            ApiError::Authentication => Some(routes::SIGN_IN),
            ApiError::NotFound => Some(routes::SECRETS),
            ApiError::Validation(_) | ApiError::Password(_) | ApiError::Store(_) => None,
        }
    }

    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

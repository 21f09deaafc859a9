//! # Domain models for users and secrets
//!
//! Defines the records persisted through [`crate::Store`] and the client-safe
//! projection handed to callers that render pages.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`User`] | A registered account. Carries the Argon2 `password_hash` when a password was set, so it never leaves the server side. |
//! | [`UserInfo`] | The subset of a [`User`] that is safe to display: id, name and email. |
//! | [`Secret`] | A short post with a title and body, owned by exactly one [`User`] through `author_id`. |
//!
//! Ids are UUID v4 values generated by [`User::new`] and [`Secret::new`]; the
//! `created_at` timestamp and the store's insertion order define recency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full user record as persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// PHC-format Argon2 hash, `None` when the account has no password.
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh record with a generated id.
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Convert to UserInfo for display.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// User information safe to render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A secret authored by a user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Secret {
    pub fn new(title: impl Into<String>, body: impl Into<String>, author_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user_id` wrote this secret.
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

//! # Store — the persistence seam for users and secrets
//!
//! Every flow in the `api` crate reads and writes through the [`Store`] trait,
//! so the same rules run against the in-memory store ([`crate::MemoryStore`])
//! in tests and against PostgreSQL on the server.
//!
//! ## Guarantees implementations must provide
//!
//! - [`insert_user`](Store::insert_user) and [`update_user`](Store::update_user)
//!   reject an email already held by another user with
//!   [`StoreError::DuplicateEmail`]. The check is atomic with the write, which is
//!   what closes the race between two concurrent sign-ups.
//! - [`insert_secret`](Store::insert_secret) and [`update_secret`](Store::update_secret)
//!   reject a secret whose author row no longer exists with
//!   [`StoreError::MissingAuthor`].
//! - [`delete_user`](Store::delete_user) removes the user's secrets too.
//! - [`list_secrets`](Store::list_secrets) and [`recent_secrets`](Store::recent_secrets)
//!   return the most recently created secret first.

use std::future::Future;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{Secret, User};

/// Errors raised by a [`Store`] implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("email {0} is already taken")]
    DuplicateEmail(String),
    #[error("author {0} does not exist")]
    MissingAuthor(Uuid),
    #[error("store lock poisoned")]
    Poisoned,
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Async trait for storing and retrieving users and secrets.
pub trait Store {
    fn find_user(&self, id: Uuid) -> impl Future<Output = Result<Option<User>, StoreError>>;
    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>>;
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, StoreError>>;
    fn insert_user(&self, user: User) -> impl Future<Output = Result<(), StoreError>>;
    /// Returns `false` when no such user existed; nothing is written then.
    fn update_user(&self, user: User) -> impl Future<Output = Result<bool, StoreError>>;
    /// Returns `false` when no such user existed.
    fn delete_user(&self, id: Uuid) -> impl Future<Output = Result<bool, StoreError>>;

    fn find_secret(&self, id: Uuid) -> impl Future<Output = Result<Option<Secret>, StoreError>>;
    fn list_secrets(&self) -> impl Future<Output = Result<Vec<Secret>, StoreError>>;
    fn recent_secrets(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Secret>, StoreError>>;
    fn secrets_by_author(
        &self,
        author_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Secret>, StoreError>>;
    fn insert_secret(&self, secret: Secret) -> impl Future<Output = Result<(), StoreError>>;
    /// Returns `false` when no such secret existed; nothing is written then.
    fn update_secret(&self, secret: Secret) -> impl Future<Output = Result<bool, StoreError>>;
    /// Returns `false` when no such secret existed.
    fn delete_secret(&self, id: Uuid) -> impl Future<Output = Result<bool, StoreError>>;
}

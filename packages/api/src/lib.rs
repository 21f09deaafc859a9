//! # API crate — rules and request flows for the secrets app
//!
//! This crate is everything between an HTTP shell and the store. The shell
//! decodes a request into a form and a [`Session`], calls one [`App`] method,
//! and turns the result into a page, a flash notice, or a redirect.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`validation`] | — | Field rules for users and secrets; reports every violation at once |
//! | [`policy`] | — | Visitor/member/author access decisions and author-name masking |
//! | [`auth`] | — | Argon2 password hashing and the explicit [`Session`] |
//! | [`users`] / [`secrets`] | — | Request flows on [`App`] for each resource |
//! | [`routes`] | — | Redirect paths and flash notices |
//! | [`config`] | — | Loads `secrets.toml` named by `SECRETS_CONFIG` |
//! | [`db`] | `server` | PostgreSQL pool and [`store::Store`] implementation |
//!
//! ## Flows exposed here
//!
//! - **Sessions**: `current_actor`, `sign_in`, `sign_out`
//! - **Users**: `list_users`, `sign_up`, `show_user`, `update_user`, `delete_user`
//! - **Secrets**: `list_secrets`, `last_five`, `show_secret`, `create_secret`,
//!   `update_secret`, `delete_secret`

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod policy;
pub mod routes;
pub mod secrets;
pub mod users;
pub mod validation;

pub use app::{App, Outcome, SignedIn};
pub use auth::Session;
pub use error::ApiError;
pub use policy::{Action, Actor, Decision, Denial, Resource};
pub use secrets::SecretView;
pub use users::UserProfile;
pub use validation::{SecretForm, UserForm, ValidationErrors};

pub use store::{MemoryStore, Secret, SecretsConfig, Store, User, UserInfo};

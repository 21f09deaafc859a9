//! # Application flows — sessions
//!
//! [`App`] bundles a [`Store`] with the loaded [`SecretsConfig`] and exposes one
//! async method per request the web shell handles. Every method takes the
//! caller's [`Session`] explicitly and returns either a typed result or an
//! [`ApiError`] the shell maps to a form error or a redirect.
//!
//! Each state-changing flow runs in the same order: resolve the actor,
//! [authorize](crate::policy::authorize), [validate](crate::validation), then
//! write. A failure at any step leaves the store untouched.
//!
//! Flows are split by resource: this file holds the session flows, user flows
//! live in [`crate::users`] and secret flows in [`crate::secrets`].

use serde::Serialize;
use store::{SecretsConfig, Store, UserInfo};

use crate::auth::{verify_password, Session};
use crate::error::ApiError;
use crate::policy::{authorize, Action, Actor, Resource};
use crate::routes;

/// Successful state change: what was produced, the flash notice and where to go next.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub value: T,
    pub notice: &'static str,
    pub redirect: String,
}

impl<T> Outcome<T> {
    pub fn new(value: T, notice: &'static str, redirect: impl Into<String>) -> Self {
        Self {
            value,
            notice,
            redirect: redirect.into(),
        }
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignedIn {
    pub user: UserInfo,
    /// `Welcome, <name>`
    pub greeting: String,
    pub redirect: &'static str,
}

pub struct App<S: Store> {
    pub(crate) store: S,
    pub(crate) config: SecretsConfig,
}

impl<S: Store> App<S> {
    pub fn new(store: S, config: SecretsConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SecretsConfig {
        &self.config
    }

    /// Resolve a session to an actor. A session pointing at a user that no
    /// longer exists is treated as anonymous.
    pub async fn current_actor(&self, session: &Session) -> Result<Actor, ApiError> {
        let Some(user_id) = session.user_id() else {
            return Ok(Actor::Anonymous);
        };

        match self.store.find_user(user_id).await? {
            Some(user) => Ok(Actor::User(user.to_info())),
            None => {
                tracing::debug!("Session refers to missing user {}", user_id);
                Ok(Actor::Anonymous)
            }
        }
    }

    /// Policy check that logs denials.
    pub(crate) fn authorize(&self, actor: &Actor, action: Action, resource: Resource) -> Result<(), ApiError> {
        authorize(actor, action, resource).into_result().map_err(|denial| {
            tracing::warn!(
                "Denied {:?} on {:?} for {:?}: {}",
                action,
                resource,
                actor.user_id(),
                denial
            );
            ApiError::Unauthorized(denial)
        })
    }

    /// Log in with email and password.
    ///
    /// Any mismatch, including an account without a password, fails with the
    /// same [`ApiError::Authentication`] and leaves the session empty.
    pub async fn sign_in(
        &self,
        session: &mut Session,
        email: &str,
        password: &str,
    ) -> Result<SignedIn, ApiError> {
        session.clear();

        let Some(user) = self.store.find_user_by_email(email).await? else {
            tracing::warn!("Sign-in failed: unknown email");
            return Err(ApiError::Authentication);
        };

        let Some(ref hash) = user.password_hash else {
            tracing::warn!("Sign-in failed: user {} has no password", user.id);
            return Err(ApiError::Authentication);
        };

        if !verify_password(password, hash)? {
            tracing::warn!("Sign-in failed: wrong password for user {}", user.id);
            return Err(ApiError::Authentication);
        }

        session.sign_in(user.id);
        tracing::info!("User {} signed in", user.id);

        Ok(SignedIn {
            greeting: routes::welcome(&user.name),
            user: user.to_info(),
            redirect: routes::SECRETS,
        })
    }

    /// Log out by clearing the session.
    pub fn sign_out(&self, session: &mut Session) -> Outcome<()> {
        if let Some(id) = session.user_id() {
            tracing::info!("User {} signed out", id);
        }
        session.clear();
        Outcome::new((), routes::SIGNED_OUT, routes::ROOT)
    }
}

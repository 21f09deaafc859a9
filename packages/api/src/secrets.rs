//! Secret flows: listing, detail, create, edit, delete.
//!
//! Listings come back as [`SecretView`] rows that are already shaped for the
//! actor who asked: visitors get the configured placeholder instead of the
//! author's name, and only the author's own rows are marked editable.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use store::{Secret, Store};
use uuid::Uuid;

use crate::app::{App, Outcome};
use crate::auth::Session;
use crate::error::ApiError;
use crate::policy::{author_display, Action, Actor, Denial, Resource};
use crate::routes;
use crate::validation::{SecretForm, Validator};

/// One secret as the current actor may see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretView {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    /// Author name, or the masked placeholder for visitors.
    pub author: String,
    /// Whether the actor may edit and destroy this secret.
    pub editable: bool,
}

impl SecretView {
    pub fn edit_path(&self) -> Option<String> {
        self.editable.then(|| routes::edit_secret_path(self.id))
    }

    pub fn destroy_path(&self) -> Option<String> {
        self.editable.then(|| routes::secret_path(self.id))
    }
}

impl<S: Store> App<S> {
    /// Shape secrets for `actor`, resolving author names in one pass.
    pub(crate) async fn secret_views(&self, actor: &Actor, secrets: Vec<Secret>) -> Result<Vec<SecretView>, ApiError> {
        let names: HashMap<Uuid, String> = if actor.is_anonymous() {
            HashMap::new()
        } else {
            self.store
                .list_users()
                .await?
                .into_iter()
                .map(|u| (u.id, u.name))
                .collect()
        };
        let placeholder = self.config.display.hidden_author.as_str();

        Ok(secrets
            .into_iter()
            .map(|secret| {
                let name = names.get(&secret.author_id).map(String::as_str).unwrap_or_default();
                SecretView {
                    author: author_display(actor, name, placeholder).to_string(),
                    editable: actor.user_id() == Some(secret.author_id),
                    id: secret.id,
                    title: secret.title,
                    body: secret.body,
                }
            })
            .collect())
    }

    /// Every secret, newest first.
    pub async fn list_secrets(&self, session: &Session) -> Result<Vec<SecretView>, ApiError> {
        let actor = self.current_actor(session).await?;
        self.authorize(&actor, Action::ViewList, Resource::Secrets)?;

        let secrets = self.store.list_secrets().await?;
        self.secret_views(&actor, secrets).await
    }

    /// The most recently created secrets, up to `listing.recent_limit`.
    pub async fn last_five(&self, session: &Session) -> Result<Vec<SecretView>, ApiError> {
        let actor = self.current_actor(session).await?;
        self.authorize(&actor, Action::ViewList, Resource::Secrets)?;

        let secrets = self
            .store
            .recent_secrets(self.config.listing.recent_limit)
            .await?;
        self.secret_views(&actor, secrets).await
    }

    pub async fn show_secret(&self, session: &Session, id: Uuid) -> Result<SecretView, ApiError> {
        let actor = self.current_actor(session).await?;
        let secret = self.store.find_secret(id).await?.ok_or(ApiError::NotFound)?;
        self.authorize(&actor, Action::ViewDetail, Resource::Secret { author_id: secret.author_id })?;

        self.secret_views(&actor, vec![secret])
            .await?
            .pop()
            .ok_or(ApiError::NotFound)
    }

    /// Create a secret authored by the signed-in user.
    pub async fn create_secret(&self, session: &Session, form: SecretForm) -> Result<Outcome<Secret>, ApiError> {
        let actor = self.current_actor(session).await?;
        self.authorize(&actor, Action::Create, Resource::Secrets)?;
        let author_id = actor
            .user_id()
            .ok_or(ApiError::Unauthorized(Denial::SignInRequired))?;

        Validator::new(&self.store).secret(&form, Some(author_id)).await?;

        let secret = Secret::new(form.title, form.body, author_id);
        self.store.insert_secret(secret.clone()).await?;

        tracing::info!("Secret {} created by {}", secret.id, author_id);
        let redirect = routes::secret_path(secret.id);
        Ok(Outcome::new(secret, routes::SECRET_CREATED, redirect))
    }

    /// Change title and body of the actor's own secret.
    pub async fn update_secret(&self, session: &Session, id: Uuid, form: SecretForm) -> Result<Outcome<Secret>, ApiError> {
        let actor = self.current_actor(session).await?;
        let mut secret = self.store.find_secret(id).await?.ok_or(ApiError::NotFound)?;
        self.authorize(&actor, Action::Edit, Resource::Secret { author_id: secret.author_id })?;

        Validator::new(&self.store)
            .secret(&form, Some(secret.author_id))
            .await?;

        secret.title = form.title;
        secret.body = form.body;
        secret.updated_at = Utc::now();
        if !self.store.update_secret(secret.clone()).await? {
            return Err(ApiError::NotFound);
        }

        tracing::info!("Secret {} updated", id);
        Ok(Outcome::new(secret, routes::SECRET_UPDATED, routes::secret_path(id)))
    }

    pub async fn delete_secret(&self, session: &Session, id: Uuid) -> Result<Outcome<()>, ApiError> {
        let actor = self.current_actor(session).await?;
        let secret = self.store.find_secret(id).await?.ok_or(ApiError::NotFound)?;
        self.authorize(&actor, Action::Delete, Resource::Secret { author_id: secret.author_id })?;

        if !self.store.delete_secret(id).await? {
            return Err(ApiError::NotFound);
        }

        tracing::info!("Secret {} deleted", id);
        Ok(Outcome::new((), routes::SECRET_DESTROYED, routes::SECRETS))
    }
}

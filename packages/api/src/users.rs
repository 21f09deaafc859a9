//! User flows: listing, sign-up, profile, edit and account deletion.

use chrono::Utc;
use serde::Serialize;
use store::{Store, User, UserInfo};
use uuid::Uuid;

use crate::app::{App, Outcome};
use crate::auth::{hash_password, Session};
use crate::error::ApiError;
use crate::policy::{Action, Resource};
use crate::routes;
use crate::secrets::SecretView;
use crate::validation::{UserForm, Validator};

/// A user's detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub user: UserInfo,
    pub secrets: Vec<SecretView>,
}

impl<S: Store> App<S> {
    pub async fn list_users(&self, session: &Session) -> Result<Vec<UserInfo>, ApiError> {
        let actor = self.current_actor(session).await?;
        self.authorize(&actor, Action::ViewList, Resource::Users)?;

        Ok(self
            .store
            .list_users()
            .await?
            .iter()
            .map(User::to_info)
            .collect())
    }

    /// Register a new user and sign them in.
    pub async fn sign_up(&self, session: &mut Session, form: UserForm) -> Result<Outcome<UserInfo>, ApiError> {
        let actor = self.current_actor(session).await?;
        self.authorize(&actor, Action::Create, Resource::Users)?;

        Validator::new(&self.store).user(None, &form).await?;

        let password_hash = if form.password.is_empty() {
            None
        } else {
            Some(hash_password(&form.password)?)
        };
        let user = User::new(form.name, form.email, password_hash);
        self.store.insert_user(user.clone()).await?;

        session.sign_in(user.id);
        tracing::info!("User {} signed up", user.id);

        Ok(Outcome::new(user.to_info(), routes::USER_CREATED, routes::user_path(user.id)))
    }

    pub async fn show_user(&self, session: &Session, id: Uuid) -> Result<UserProfile, ApiError> {
        let actor = self.current_actor(session).await?;
        self.authorize(&actor, Action::ViewDetail, Resource::User { id })?;

        let user = self.store.find_user(id).await?.ok_or(ApiError::NotFound)?;
        let secrets = self.store.secrets_by_author(id).await?;
        let secrets = self.secret_views(&actor, secrets).await?;

        Ok(UserProfile {
            user: user.to_info(),
            secrets,
        })
    }

    /// Edit the signed-in user's own profile. An empty password keeps the
    /// current one.
    pub async fn update_user(&self, session: &Session, id: Uuid, form: UserForm) -> Result<Outcome<UserInfo>, ApiError> {
        let actor = self.current_actor(session).await?;
        self.authorize(&actor, Action::Edit, Resource::User { id })?;

        let mut user = self.store.find_user(id).await?.ok_or(ApiError::NotFound)?;
        Validator::new(&self.store).user(Some(id), &form).await?;

        if !form.password.is_empty() {
            user.password_hash = Some(hash_password(&form.password)?);
        }
        user.name = form.name;
        user.email = form.email;
        user.updated_at = Utc::now();
        if !self.store.update_user(user.clone()).await? {
            return Err(ApiError::NotFound);
        }

        tracing::info!("User {} updated", id);
        Ok(Outcome::new(user.to_info(), routes::USER_UPDATED, routes::user_path(id)))
    }

    /// Delete the signed-in user's own account along with their secrets, and
    /// sign them out.
    pub async fn delete_user(&self, session: &mut Session, id: Uuid) -> Result<Outcome<()>, ApiError> {
        let actor = self.current_actor(session).await?;
        self.authorize(&actor, Action::Delete, Resource::User { id })?;

        if !self.store.delete_user(id).await? {
            return Err(ApiError::NotFound);
        }
        session.clear();

        tracing::info!("User {} deleted", id);
        Ok(Outcome::new((), routes::USER_DESTROYED, routes::USERS))
    }
}

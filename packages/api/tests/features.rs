//! End-to-end request flows against the in-memory store, one test per
//! user-visible scenario.

use api::auth::hash_password;
use api::routes;
use api::{ApiError, App, Denial, MemoryStore, SecretForm, SecretsConfig, Session, Store, User, UserForm};

struct Fixture {
    app: App<MemoryStore>,
    user: User,
}

const PASSWORD: &str = "password";

async fn fixture() -> Fixture {
    let store = MemoryStore::new();
    let user = User::new("footest", "footest@example.com", Some(hash_password(PASSWORD).unwrap()));
    store.insert_user(user.clone()).await.unwrap();
    Fixture {
        app: App::new(store, SecretsConfig::default()),
        user,
    }
}

impl Fixture {
    async fn signed_in(&self) -> Session {
        let mut session = Session::anonymous();
        self.app
            .sign_in(&mut session, &self.user.email, PASSWORD)
            .await
            .unwrap();
        session
    }

    async fn seed_secret(&self) -> api::Secret {
        let session = self.signed_in().await;
        self.app
            .create_secret(&session, SecretForm::new("Seeded title", "Seeded body"))
            .await
            .unwrap()
            .value
    }
}

mod visitor {
    use super::*;

    #[tokio::test]
    async fn can_view_all_secrets() {
        let fx = fixture().await;
        fx.seed_secret().await;

        let list = fx.app.list_secrets(&Session::anonymous()).await.unwrap();
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn can_reach_user_list() {
        let fx = fixture().await;
        let users = fx.app.list_users(&Session::anonymous()).await.unwrap();
        assert_eq!(users[0].name, "footest");
    }

    #[tokio::test]
    async fn author_names_are_hidden() {
        let fx = fixture().await;
        fx.seed_secret().await;

        let list = fx.app.list_secrets(&Session::anonymous()).await.unwrap();
        assert!(list.iter().all(|s| s.author == "**hidden**"));
        assert!(list.iter().all(|s| s.author != fx.user.name));
    }

    #[tokio::test]
    async fn showing_a_user_redirects_to_sign_in() {
        let fx = fixture().await;

        let err = fx
            .app
            .show_user(&Session::anonymous(), fx.user.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(Denial::SignInRequired)));
        assert_eq!(err.redirect_to(), Some(routes::SIGN_IN));
    }
}

mod sign_up {
    use super::*;

    #[tokio::test]
    async fn valid_information_lands_on_new_user_page() {
        let fx = fixture().await;
        let mut session = Session::anonymous();

        let form = UserForm {
            name: "newbie".to_string(),
            email: "newbie@example.com".to_string(),
            password: "password".to_string(),
            password_confirmation: "password".to_string(),
        };
        let outcome = fx.app.sign_up(&mut session, form).await.unwrap();

        let newest = fx.app.store().list_users().await.unwrap().pop().unwrap();
        assert_eq!(outcome.redirect, routes::user_path(newest.id));

        let profile = fx.app.show_user(&session, newest.id).await.unwrap();
        assert_eq!(profile.user.name, "newbie");
        assert_eq!(profile.user.email, "newbie@example.com");
    }
}

mod sign_in_and_out {
    use super::*;

    #[tokio::test]
    async fn valid_information_greets_by_name() {
        let fx = fixture().await;
        let mut session = Session::anonymous();

        let signed_in = fx
            .app
            .sign_in(&mut session, &fx.user.email, PASSWORD)
            .await
            .unwrap();
        assert_eq!(signed_in.greeting, format!("Welcome, {}", fx.user.name));
    }

    #[tokio::test]
    async fn invalid_email_returns_to_sign_in() {
        let fx = fixture().await;
        let mut session = Session::anonymous();

        let err = fx
            .app
            .sign_in(&mut session, "invalid_email@test.com", PASSWORD)
            .await
            .unwrap_err();
        assert_eq!(err.redirect_to(), Some(routes::SIGN_IN));
        assert!(fx.app.current_actor(&session).await.unwrap().is_anonymous());
    }

    #[tokio::test]
    async fn signing_out_returns_to_root_as_visitor() {
        let fx = fixture().await;
        let mut session = fx.signed_in().await;

        let outcome = fx.app.sign_out(&mut session);
        assert_eq!(outcome.redirect, routes::ROOT);
        assert!(fx.app.current_actor(&session).await.unwrap().is_anonymous());
    }
}

mod signed_in_secrets {
    use super::*;

    #[tokio::test]
    async fn user_can_create_a_secret() {
        let fx = fixture().await;
        let session = fx.signed_in().await;

        let outcome = fx
            .app
            .create_secret(&session, SecretForm::new("Test title", "Test sentence"))
            .await
            .unwrap();
        assert!(outcome.notice.contains("successfully created"));

        let list = fx.app.list_secrets(&session).await.unwrap();
        assert!(list.iter().any(|s| s.title == "Test title" && s.body == "Test sentence"));
    }

    #[tokio::test]
    async fn user_can_edit_a_secret() {
        let fx = fixture().await;
        let secret = fx.seed_secret().await;
        let session = fx.signed_in().await;

        let list = fx.app.list_secrets(&session).await.unwrap();
        assert_eq!(list[0].edit_path(), Some(format!("/secrets/{}/edit", secret.id)));

        fx.app
            .update_secret(&session, secret.id, SecretForm::new("New title", secret.body.clone()))
            .await
            .unwrap();

        let list = fx.app.list_secrets(&session).await.unwrap();
        assert_eq!(list[0].title, "New title");
    }

    #[tokio::test]
    async fn user_can_delete_a_secret() {
        let fx = fixture().await;
        let secret = fx.seed_secret().await;
        let session = fx.signed_in().await;

        let list = fx.app.list_secrets(&session).await.unwrap();
        assert_eq!(list[0].destroy_path(), Some(format!("/secrets/{}", secret.id)));

        fx.app.delete_secret(&session, secret.id).await.unwrap();

        let list = fx.app.list_secrets(&session).await.unwrap();
        assert!(list.iter().all(|s| s.title != secret.title));
    }

    #[tokio::test]
    async fn another_member_cannot_touch_it() {
        let fx = fixture().await;
        let secret = fx.seed_secret().await;

        let mut other = Session::anonymous();
        fx.app
            .sign_up(&mut other, UserForm::new("intruder", "intruder@example.com", "password"))
            .await
            .unwrap();

        let err = fx.app.delete_secret(&other, secret.id).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(Denial::NotOwner)));
        assert_eq!(fx.app.list_secrets(&other).await.unwrap().len(), 1);
    }
}

mod models {
    use super::*;
    use api::validation::{Field, Rule};

    #[tokio::test]
    async fn second_user_with_same_email_is_invalid() {
        let fx = fixture().await;
        let err = fx
            .app
            .sign_up(
                &mut Session::anonymous(),
                UserForm::new("another", fx.user.email.clone(), "password"),
            )
            .await
            .unwrap_err();
        assert!(err.validation().unwrap().contains(Field::Email, Rule::Taken));
    }

    #[tokio::test]
    async fn last_five_caps_at_five() {
        let fx = fixture().await;
        let session = fx.signed_in().await;

        for i in 0..5 {
            fx.app
                .create_secret(&session, SecretForm::new(format!("secret {i}"), "body text"))
                .await
                .unwrap();
        }
        assert_eq!(fx.app.last_five(&session).await.unwrap().len(), 5);

        fx.app
            .create_secret(&session, SecretForm::new("secret 5", "body text"))
            .await
            .unwrap();
        let recent = fx.app.last_five(&session).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].title, "secret 5");
    }

    #[tokio::test]
    async fn last_five_with_fewer_secrets() {
        let fx = fixture().await;
        let session = fx.signed_in().await;

        for i in 0..4 {
            fx.app
                .create_secret(&session, SecretForm::new(format!("secret {i}"), "body text"))
                .await
                .unwrap();
        }
        assert_eq!(fx.app.last_five(&session).await.unwrap().len(), 4);
    }
}

mod concurrent_writes {
    use super::*;
    use store::StoreError;
    use uuid::Uuid;

    /// Delegates to a [`MemoryStore`], simulating writes that race the
    /// flow between its read and its write.
    #[derive(Clone, Default)]
    struct RacingStore {
        inner: MemoryStore,
        /// Email lookups miss, as if another sign-up landed after the read.
        stale_email_lookup: bool,
        /// The row is deleted just before an update reaches the store.
        delete_before_update: bool,
    }

    impl Store for RacingStore {
        async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
            self.inner.find_user(id).await
        }

        async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
            if self.stale_email_lookup {
                return Ok(None);
            }
            self.inner.find_user_by_email(email).await
        }

        async fn list_users(&self) -> Result<Vec<User>, StoreError> {
            self.inner.list_users().await
        }

        async fn insert_user(&self, user: User) -> Result<(), StoreError> {
            self.inner.insert_user(user).await
        }

        async fn update_user(&self, user: User) -> Result<bool, StoreError> {
            if self.delete_before_update {
                self.inner.delete_user(user.id).await?;
            }
            self.inner.update_user(user).await
        }

        async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
            self.inner.delete_user(id).await
        }

        async fn find_secret(&self, id: Uuid) -> Result<Option<api::Secret>, StoreError> {
            self.inner.find_secret(id).await
        }

        async fn list_secrets(&self) -> Result<Vec<api::Secret>, StoreError> {
            self.inner.list_secrets().await
        }

        async fn recent_secrets(&self, limit: usize) -> Result<Vec<api::Secret>, StoreError> {
            self.inner.recent_secrets(limit).await
        }

        async fn secrets_by_author(&self, author_id: Uuid) -> Result<Vec<api::Secret>, StoreError> {
            self.inner.secrets_by_author(author_id).await
        }

        async fn insert_secret(&self, secret: api::Secret) -> Result<(), StoreError> {
            self.inner.insert_secret(secret).await
        }

        async fn update_secret(&self, secret: api::Secret) -> Result<bool, StoreError> {
            if self.delete_before_update {
                self.inner.delete_secret(secret.id).await?;
            }
            self.inner.update_secret(secret).await
        }

        async fn delete_secret(&self, id: Uuid) -> Result<bool, StoreError> {
            self.inner.delete_secret(id).await
        }
    }

    fn racing(store: RacingStore) -> App<RacingStore> {
        App::new(store, SecretsConfig::default())
    }

    #[tokio::test]
    async fn duplicate_email_caught_by_store_is_reported_as_taken() {
        let store = RacingStore {
            stale_email_lookup: true,
            ..RacingStore::default()
        };
        let app = racing(store);
        app.sign_up(
            &mut Session::anonymous(),
            UserForm::new("footest", "footest@example.com", PASSWORD),
        )
        .await
        .unwrap();

        let mut session = Session::anonymous();
        let err = app
            .sign_up(&mut session, UserForm::new("another", "footest@example.com", PASSWORD))
            .await
            .unwrap_err();

        let errors = err.validation().unwrap();
        assert_eq!(errors.full_messages(), ["Email has already been taken"]);
        assert!(session.user_id().is_none());
        assert_eq!(app.store().list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn editing_a_secret_deleted_mid_request_is_not_found() {
        let app = racing(RacingStore::default());
        let mut session = Session::anonymous();
        app.sign_up(&mut session, UserForm::new("footest", "footest@example.com", PASSWORD))
            .await
            .unwrap();
        let secret = app
            .create_secret(&session, SecretForm::new("Test title", "Test sentence"))
            .await
            .unwrap()
            .value;

        let app = racing(RacingStore {
            inner: app.store().inner.clone(),
            delete_before_update: true,
            ..RacingStore::default()
        });
        let err = app
            .update_secret(&session, secret.id, SecretForm::new("New title", "Test sentence"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound));
        assert!(app.store().find_secret(secret.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn editing_an_account_deleted_mid_request_is_not_found() {
        let store = RacingStore::default();
        let app = racing(store.clone());
        let mut session = Session::anonymous();
        let user = app
            .sign_up(&mut session, UserForm::new("footest", "footest@example.com", PASSWORD))
            .await
            .unwrap()
            .value;

        let app = racing(RacingStore {
            delete_before_update: true,
            ..store
        });
        let err = app
            .update_user(&session, user.id, UserForm::new("renamed", "renamed@example.com", ""))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound));
        assert!(app.store().find_user(user.id).await.unwrap().is_none());
        assert!(app.store().list_users().await.unwrap().is_empty());
    }
}

//! PostgreSQL implementation of [`Store`].

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use store::{Secret, Store, StoreError, User};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SecretRow {
    id: Uuid,
    title: String,
    body: String,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SecretRow> for Secret {
    fn from(row: SecretRow) -> Self {
        Secret {
            id: row.id,
            title: row.title,
            body: row.body,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";
const SECRET_COLUMNS: &str = "id, title, body, author_id, created_at, updated_at";

fn backend(err: sqlx::Error) -> StoreError {
    tracing::error!("Database error: {}", err);
    StoreError::Backend(err.to_string())
}

/// Map constraint violations on a user write.
fn user_write_error(err: sqlx::Error, email: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::DuplicateEmail(email.to_string())
        }
        _ => backend(err),
    }
}

/// Map constraint violations on a secret write.
fn secret_write_error(err: sqlx::Error, author_id: Uuid) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::MissingAuthor(author_id)
        }
        _ => backend(err),
    }
}

/// Store backed by a PostgreSQL pool.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_secrets(&self, sql: &str) -> Result<Vec<Secret>, StoreError> {
        let rows: Vec<SecretRow> = sqlx::query_as(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(Secret::from).collect())
    }
}

impl Store for PgStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
        Ok(row.map(User::from))
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at"))
                .fetch_all(&self.pool)
                .await
                .map_err(backend)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn insert_user(&self, user: User) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| user_write_error(e, &user.email))?;
        Ok(())
    }

    async fn update_user(&self, user: User) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET name = $2, email = $3, password_hash = $4, updated_at = $5
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| user_write_error(e, &user.email))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_secret(&self, id: Uuid) -> Result<Option<Secret>, StoreError> {
        let row: Option<SecretRow> =
            sqlx::query_as(&format!("SELECT {SECRET_COLUMNS} FROM secrets WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
        Ok(row.map(Secret::from))
    }

    async fn list_secrets(&self) -> Result<Vec<Secret>, StoreError> {
        self.fetch_secrets(&format!(
            "SELECT {SECRET_COLUMNS} FROM secrets ORDER BY created_at DESC, seq DESC"
        ))
        .await
    }

    async fn recent_secrets(&self, limit: usize) -> Result<Vec<Secret>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<SecretRow> = sqlx::query_as(&format!(
            "SELECT {SECRET_COLUMNS} FROM secrets ORDER BY created_at DESC, seq DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(Secret::from).collect())
    }

    async fn secrets_by_author(&self, author_id: Uuid) -> Result<Vec<Secret>, StoreError> {
        let rows: Vec<SecretRow> = sqlx::query_as(&format!(
            "SELECT {SECRET_COLUMNS} FROM secrets WHERE author_id = $1
             ORDER BY created_at DESC, seq DESC"
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(Secret::from).collect())
    }

    async fn insert_secret(&self, secret: Secret) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO secrets (id, title, body, author_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(secret.id)
        .bind(&secret.title)
        .bind(&secret.body)
        .bind(secret.author_id)
        .bind(secret.created_at)
        .bind(secret.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| secret_write_error(e, secret.author_id))?;
        Ok(())
    }

    async fn update_secret(&self, secret: Secret) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE secrets SET title = $2, body = $3, author_id = $4, updated_at = $5
             WHERE id = $1",
        )
        .bind(secret.id)
        .bind(&secret.title)
        .bind(&secret.body)
        .bind(secret.author_id)
        .bind(secret.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| secret_write_error(e, secret.author_id))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_secret(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM secrets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }
}

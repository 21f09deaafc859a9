use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::models::{Secret, User};
use crate::repo::{Store, StoreError};

/// In-memory Store for tests and local runs.
///
/// Both tables sit behind one lock so the uniqueness and author checks are
/// atomic with the write that depends on them. Rows are kept in insertion
/// order, which is creation order.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    secrets: Vec<Secret>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl Tables {
    fn email_taken_by_other(&self, email: &str, id: Uuid) -> bool {
        self.users.iter().any(|u| u.email == email && u.id != id)
    }

    fn has_user(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }
}

impl Store for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.tables()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()?
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables()?.users.clone())
    }

    async fn insert_user(&self, user: User) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.email_taken_by_other(&user.email, user.id) {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        tables.users.push(user);
        Ok(())
    }

    async fn update_user(&self, user: User) -> Result<bool, StoreError> {
        let mut tables = self.tables()?;
        if tables.email_taken_by_other(&user.email, user.id) {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        match tables.users.iter_mut().find(|u| u.id == user.id) {
            Some(row) => {
                *row = user;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables()?;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }
        tables.secrets.retain(|s| s.author_id != id);
        Ok(true)
    }

    async fn find_secret(&self, id: Uuid) -> Result<Option<Secret>, StoreError> {
        Ok(self.tables()?.secrets.iter().find(|s| s.id == id).cloned())
    }

    async fn list_secrets(&self) -> Result<Vec<Secret>, StoreError> {
        Ok(self.tables()?.secrets.iter().rev().cloned().collect())
    }

    async fn recent_secrets(&self, limit: usize) -> Result<Vec<Secret>, StoreError> {
        Ok(self
            .tables()?
            .secrets
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn secrets_by_author(&self, author_id: Uuid) -> Result<Vec<Secret>, StoreError> {
        Ok(self
            .tables()?
            .secrets
            .iter()
            .rev()
            .filter(|s| s.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn insert_secret(&self, secret: Secret) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if !tables.has_user(secret.author_id) {
            return Err(StoreError::MissingAuthor(secret.author_id));
        }
        tables.secrets.push(secret);
        Ok(())
    }

    async fn update_secret(&self, secret: Secret) -> Result<bool, StoreError> {
        let mut tables = self.tables()?;
        if !tables.has_user(secret.author_id) {
            return Err(StoreError::MissingAuthor(secret.author_id));
        }
        match tables.secrets.iter_mut().find(|s| s.id == secret.id) {
            Some(row) => {
                *row = secret;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_secret(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables()?;
        let before = tables.secrets.len();
        tables.secrets.retain(|s| s.id != id);
        Ok(tables.secrets.len() != before)
    }
}

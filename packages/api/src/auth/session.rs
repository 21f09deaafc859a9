//! Session data passed explicitly into every flow.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the request layer keeps in its cookie-backed session store.
///
/// Holds the signed-in user's id as a string, exactly as it is stored under
/// the `user_id` key. An empty session is an anonymous visitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn sign_in(&mut self, user_id: Uuid) {
        self.user_id = Some(user_id.to_string());
    }

    pub fn clear(&mut self) {
        self.user_id = None;
    }

    /// The stored id, if present and well-formed.
    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
            .as_deref()
            .and_then(|id| Uuid::parse_str(id).ok())
    }
}

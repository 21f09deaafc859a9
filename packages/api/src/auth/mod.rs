//! Local password authentication and session data.

mod password;
mod session;

pub use password::{hash_password, verify_password};
pub use session::Session;

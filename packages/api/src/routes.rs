//! Paths and notices the request layer turns into redirects and flash messages.

use uuid::Uuid;

pub const ROOT: &str = "/";
pub const SECRETS: &str = "/secrets";
pub const USERS: &str = "/users";
pub const SIGN_IN: &str = "/sessions/new";

pub const SECRET_CREATED: &str = "Secret was successfully created.";
pub const SECRET_UPDATED: &str = "Secret was successfully updated.";
pub const SECRET_DESTROYED: &str = "Secret was successfully destroyed.";
pub const USER_CREATED: &str = "User was successfully created.";
pub const USER_UPDATED: &str = "User was successfully updated.";
pub const USER_DESTROYED: &str = "User was successfully destroyed.";
pub const SIGNED_OUT: &str = "Logged out.";

pub fn secret_path(id: Uuid) -> String {
    format!("{SECRETS}/{id}")
}

pub fn edit_secret_path(id: Uuid) -> String {
    format!("{SECRETS}/{id}/edit")
}

pub fn user_path(id: Uuid) -> String {
    format!("{USERS}/{id}")
}

/// Greeting shown after a successful sign-in.
pub fn welcome(name: &str) -> String {
    format!("Welcome, {name}")
}

pub mod config;
pub mod models;
pub mod repo;

mod memory;
pub use memory::MemoryStore;

pub use config::SecretsConfig;
pub use models::{Secret, User, UserInfo};
pub use repo::{Store, StoreError};

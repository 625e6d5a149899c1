pub mod password;
mod repo;
pub mod repo_types;
pub mod services;
pub mod store;

pub use repo_types::User;
pub use services::ValidationError;
pub use store::{CredentialStore, SqliteCredentialStore};

//! Storage and persistence layer
//!
//! - File system operations
//! - Persisted store settings model

mod file_system;
mod models;

pub use file_system::Storage;
pub use models::{StoreCredentials, StoreSettings};

//! Persistence layer.
//!
//! # Architecture
//!
//! - `models`: Domain entities (User, Task, Category)
//! - `repository`: Trait definitions for data access
//! - `classify`: Storage error classification
//! - `sqlite`: SQLx/SQLite implementations and the database handle
//! - `store`: The repository aggregate handed to the HTTP layer

mod classify;
mod models;
mod repository;
mod store;

pub mod sqlite;
pub mod utils;

#[cfg(test)]
mod classify_test;
#[cfg(test)]
mod models_test;

pub use classify::ErrorClassifier;
pub use models::*;
pub use repository::*;
pub use sqlite::SqliteDatabase;
pub use store::Store;

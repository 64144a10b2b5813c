//! SQLite implementation of the repository traits.

mod category;
mod connection;
mod helpers;
mod task;
mod user;

#[cfg(test)]
mod critical_tests;
#[cfg(test)]
mod user_test;

pub use category::SqliteCategoryRepository;
pub use connection::SqliteDatabase;
pub use task::SqliteTaskRepository;
pub use user::SqliteUserRepository;

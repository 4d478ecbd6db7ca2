//! SQLite backend for the stope operations store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every live-row write and its shadow-row
//! write share one SQLite transaction.

mod encode;
mod schema;
mod store;

pub mod error;
pub mod migrate;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;

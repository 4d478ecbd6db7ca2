//! Core types and trait definitions for the stope mining-operations store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod history;
pub mod labor;
pub mod measurement;
pub mod org;
pub mod production;
pub mod report;
pub mod store;
pub mod validate;

pub use error::{Error, Result};

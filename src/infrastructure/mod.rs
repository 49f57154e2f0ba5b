//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`database`] - Connection pool and schema bootstrap
//! - [`persistence`] - Repository implementations (PostgreSQL and in-memory)

pub mod database;
pub mod persistence;

pub use database::{Database, PoolSettings};

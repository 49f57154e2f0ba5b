//! Helpers shared across layers.
//!
//! - [`code_generator`] - Short code generation and format checks
//! - [`url_validator`] - Destination URL scheme checks
//! - [`db_error`] - Database error classification

pub mod code_generator;
pub mod db_error;
pub mod url_validator;

//! Core domain entities.
//!
//! - [`Link`] - A stored short link with click counters
//! - [`NewLink`] - Row to insert once the code is resolved
//! - [`LinkInput`] - Validated create request

pub mod link;

pub use link::{Link, LinkInput, NewLink};

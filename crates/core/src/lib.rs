//! Core business logic for hotdeals-rs.
//!
//! Services own the behavior of each domain operation; the [`policy`] module
//! holds the visibility and authorization rules they (and the API layer)
//! consult.

pub mod pagination;
pub mod policy;
pub mod services;

pub use pagination::Page;
pub use services::*;

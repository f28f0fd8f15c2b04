//! HTTP API layer for hotdeals-rs.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: auth, deals (with votes and comments), admin
//! - **Extractors**: required and optional authentication
//! - **Middleware**: bearer-token resolution into request extensions
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;

pub use endpoints::router;

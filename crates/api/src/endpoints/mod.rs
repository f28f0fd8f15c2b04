//! API endpoints.

mod admin;
mod auth;
mod comments;
mod deals;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/deals", deals::router())
        .nest("/comments", comments::router())
        .nest("/admin", admin::router())
}

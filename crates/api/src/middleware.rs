//! API middleware and shared application state.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use hotdeals_core::{
    AuthService, CommentService, DealService, ModerationService, UserService, VoteService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub deal_service: DealService,
    pub vote_service: VoteService,
    pub comment_service: CommentService,
    pub moderation_service: ModerationService,
    pub user_service: UserService,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` token into a user record stored as a request
/// extension. Invalid or absent tokens are ignored here so optional-auth
/// routes proceed unauthenticated; the extractors decide whether an identity
/// is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.auth_service.verify(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}

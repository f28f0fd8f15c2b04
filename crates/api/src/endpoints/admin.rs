//! Admin and moderation endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
    routing::patch,
};
use hotdeals_common::AppResult;
use hotdeals_core::{AuthorContact, Page, PendingDealView, policy};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::{auth::UserResponse, deals::DealResponse, deals::ListQuery},
    extractors::AuthUser,
    middleware::AppState,
};

/// Pending deal with its author contact projection.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingDealResponse {
    #[serde(flatten)]
    pub deal: DealResponse,
    pub author: Option<AuthorContact>,
}

impl From<PendingDealView> for PendingDealResponse {
    fn from(view: PendingDealView) -> Self {
        // The flattened deal's own author slot stays empty; the contact
        // projection below is the one the queue shows
        Self {
            deal: DealResponse::from(view.deal),
            author: view.author,
        }
    }
}

/// The moderation queue: pending deals newest-first.
async fn pending_deals(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PendingDealResponse>>> {
    policy::require_moderation(&user)?;

    let queue = state.moderation_service.pending().await?;

    Ok(Json(queue.into_iter().map(PendingDealResponse::from).collect()))
}

/// Moderation request body.
#[derive(Debug, Deserialize)]
pub struct ModerateRequest {
    /// Requested status, "approved" or "rejected".
    pub status: String,
}

/// Approve or reject a deal.
async fn moderate_deal(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ModerateRequest>,
) -> AppResult<Json<DealResponse>> {
    policy::require_moderation(&user)?;

    let deal = state.moderation_service.moderate(&id, &req.status).await?;

    Ok(Json(deal.into()))
}

/// List users newest-first (admin directory).
async fn list_users(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<UserResponse>>> {
    policy::require_admin(&user)?;

    let page = state.user_service.list(query.page, query.limit).await?;

    Ok(Json(page.map(UserResponse::from)))
}

/// Role change request body.
#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    /// Requested role, one of "user", "moderator", "admin".
    pub role: String,
}

/// Change a user's role.
async fn set_user_role(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RoleRequest>,
) -> AppResult<Json<UserResponse>> {
    policy::require_admin(&user)?;

    let updated = state.user_service.set_role(&id, &req.role).await?;

    Ok(Json(updated.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deals/pending", get(pending_deals))
        .route("/deals/{id}/moderate", patch(moderate_deal))
        .route("/users", get(list_users))
        .route("/users/{id}/role", patch(set_user_role))
}

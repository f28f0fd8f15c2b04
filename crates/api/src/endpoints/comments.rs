//! Comment endpoints.
//!
//! Listing and creation live under `/deals/{id}/comments`; editing and
//! deletion address the comment directly under `/comments/{id}`.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::put,
};
use hotdeals_common::AppResult;
use hotdeals_core::{AuthorView, CommentInput, CommentView};
use hotdeals_db::entities::comment;
use serde::Serialize;

use crate::{endpoints::deals::MessageResponse, extractors::AuthUser, middleware::AppState};

/// Comment response with its author projection.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub content: String,
    pub deal_id: String,
    pub author: Option<AuthorView>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        let comment: comment::Model = view.comment;
        Self {
            id: comment.id,
            content: comment.content,
            deal_id: comment.deal_id,
            author: view.author,
            created_at: comment.created_at.to_rfc3339(),
            updated_at: comment.updated_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// List the comments on a deal, newest-first.
pub async fn list_for_deal(
    State(state): State<AppState>,
    Path(deal_id): Path<String>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let comments = state.comment_service.list_for_deal(&deal_id).await?;

    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

/// Comment on an existing deal.
pub async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(deal_id): Path<String>,
    Json(input): Json<CommentInput>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    let view = state.comment_service.create(&deal_id, &user.id, input).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

/// Edit a comment (author only).
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CommentInput>,
) -> AppResult<Json<CommentResponse>> {
    let view = state.comment_service.update(&id, &user, input).await?;
    Ok(Json(view.into()))
}

/// Delete a comment (author or admin).
async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.comment_service.delete(&id, &user).await?;

    Ok(Json(MessageResponse {
        message: "Comment deleted".to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(update).delete(delete_comment))
}

//! Deal endpoints: listing, search, CRUD and voting.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    routing::post,
};
use hotdeals_common::{AppError, AppResult};
use hotdeals_core::{AuthorView, CreateDealInput, DealView, Page, UpdateDealInput};
use hotdeals_db::entities::{deal, vote::VoteKind};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::comments,
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
};

/// Deal response with its author projection.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub url: Option<String>,
    pub category: &'static str,
    pub status: &'static str,
    pub temperature: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorView>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<DealView> for DealResponse {
    fn from(view: DealView) -> Self {
        let mut response = Self::from(view.deal);
        response.author = view.author;
        response
    }
}

impl From<deal::Model> for DealResponse {
    fn from(deal: deal::Model) -> Self {
        Self {
            id: deal.id,
            title: deal.title,
            description: deal.description,
            price: deal.price,
            original_price: deal.original_price,
            url: deal.url,
            category: deal.category.as_str(),
            status: deal.status.as_str(),
            temperature: deal.temperature,
            author: None,
            created_at: deal.created_at.to_rfc3339(),
            updated_at: deal.updated_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// List deals in the viewer's status scope.
async fn list(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<DealResponse>>> {
    let page = state
        .deal_service
        .list(viewer.as_ref(), query.page, query.limit)
        .await?;

    Ok(Json(page.map(DealResponse::from)))
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Search response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub data: Vec<DealResponse>,
}

/// Substring search over title and description.
async fn search(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let q = query.q.unwrap_or_default();
    let deals = state.deal_service.search(viewer.as_ref(), &q).await?;

    Ok(Json(SearchResponse {
        query: q,
        count: deals.len(),
        data: deals.into_iter().map(DealResponse::from).collect(),
    }))
}

/// Fetch one deal. Hidden deals read as not-found.
async fn get_deal(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DealResponse>> {
    let view = state.deal_service.get(&id, viewer.as_ref()).await?;
    Ok(Json(view.into()))
}

/// Submit a new deal (enters moderation as pending).
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDealInput>,
) -> AppResult<(StatusCode, Json<DealResponse>)> {
    let view = state.deal_service.create(&user.id, input).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

/// Edit a deal (admin, or author while pending).
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateDealInput>,
) -> AppResult<Json<DealResponse>> {
    let view = state.deal_service.update(&id, &user, input).await?;
    Ok(Json(view.into()))
}

/// Plain confirmation body.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Delete a deal (author or admin).
async fn delete_deal(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.deal_service.delete(&id, &user).await?;

    Ok(Json(MessageResponse {
        message: "Deal deleted".to_string(),
    }))
}

/// Vote request body.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// Wire vote type, "hot" or "cold".
    #[serde(rename = "type")]
    pub vote_type: String,
}

/// Vote outcome: the recomputed temperature and raw counts.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub deal_id: String,
    /// The caller's current vote; null after removal.
    pub vote_type: Option<&'static str>,
    pub temperature: i32,
    pub hot_count: u64,
    pub cold_count: u64,
}

/// Cast (or restate, or flip) a vote on a deal.
async fn cast_vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> AppResult<Json<VoteResponse>> {
    // Parsed here rather than in serde so a bad value is a 400, not a
    // body-deserialization rejection
    let kind = VoteKind::parse(&req.vote_type)
        .ok_or_else(|| AppError::Validation("Invalid vote type (hot or cold)".to_string()))?;

    let stats = state.vote_service.cast(&user.id, &id, kind).await?;

    Ok(Json(VoteResponse {
        deal_id: id,
        vote_type: Some(kind.as_str()),
        temperature: stats.temperature,
        hot_count: stats.hot_count,
        cold_count: stats.cold_count,
    }))
}

/// Remove the caller's vote from a deal.
async fn remove_vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<VoteResponse>> {
    let stats = state.vote_service.retract(&user.id, &id).await?;

    Ok(Json(VoteResponse {
        deal_id: id,
        vote_type: None,
        temperature: stats.temperature,
        hot_count: stats.hot_count,
        cold_count: stats.cold_count,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/search", get(search))
        .route("/{id}", get(get_deal).put(update).delete(delete_deal))
        .route("/{id}/vote", post(cast_vote).delete(remove_vote))
        .route(
            "/{id}/comments",
            get(comments::list_for_deal).post(comments::create),
        )
}

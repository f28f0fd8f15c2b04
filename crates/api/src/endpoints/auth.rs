//! Authentication endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get, routing::post};
use hotdeals_common::AppResult;
use hotdeals_core::{LoginInput, RegisterInput};
use hotdeals_db::entities::user;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState};

/// Public user view.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: &'static str,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role.as_str(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Token plus the public view of its owner.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Create a new account.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let (token, user) = state.auth_service.register(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Authenticate with email and password.
async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<AuthResponse>> {
    let (token, user) = state.auth_service.login(input).await?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// The caller's own identity.
async fn me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user.into())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

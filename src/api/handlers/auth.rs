use crate::api::error::AppError;
use crate::api::handlers::artworks::MessageResponse;
use crate::api::middleware::auth::bearer_token;
use crate::services::auth_service::AdminIdentity;
use axum::{Extension, Form, Json, extract::State, http::HeaderMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub status: u16,
    pub message: String,
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

#[utoipa::path(
    post,
    path = "/auth/token",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Incorrect username or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Form(payload): Form<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let issued = state.auth.login(&payload.username, &payload.password).await?;

    Ok(Json(TokenResponse {
        status: 200,
        message: "Login successful".to_string(),
        access_token: issued.access_token,
        token_type: "bearer".to_string(),
        expires_at: issued.expires_at,
    }))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Successfully logged out", body = MessageResponse),
        (status = 401, description = "Missing bearer token"),
        (status = 404, description = "Token not found")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    state.auth.revoke(token).await?;

    Ok(Json(MessageResponse {
        status: 200,
        message: "Successfully logged out".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/auth/dashboard",
    responses(
        (status = 200, description = "Admin dashboard greeting", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn dashboard(Extension(identity): Extension<AdminIdentity>) -> Json<MessageResponse> {
    Json(MessageResponse {
        status: 200,
        message: format!("Welcome to the admin dashboard, {}!", identity.username),
    })
}

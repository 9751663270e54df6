use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app::AppState;
use crate::errors::AppResult;
use crate::jwt::AuthUser;
use crate::models::user::{AuthResponse, LoginRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/logout", post(logout))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    message: String,
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let principal = state
        .registry
        .auth()
        .login(&payload.email, &payload.password)
        .await?;

    let token = state.jwt.encode(principal.id)?;
    state.sessions.set(principal.clone(), token.clone()).await;

    tracing::info!(user = %principal.email, role = principal.role.as_str(), "login");

    Ok(Json(AuthResponse {
        token,
        user: principal,
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses((status = 200, description = "Current principal", body = crate::authz::Principal)),
    security(("bearerAuth" = []))
)]
pub async fn me(auth: AuthUser) -> AppResult<Json<crate::authz::Principal>> {
    Ok(Json(auth.principal))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Logout acknowledged")),
    security(("bearerAuth" = []))
)]
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<MessageResponse>> {
    state.registry.auth().logout(auth.principal.id).await?;
    state.sessions.clear().await;

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

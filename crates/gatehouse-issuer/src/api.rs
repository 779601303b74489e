//! HTTP surface of the issuer.

use crate::error::IssuerError;
use crate::issuer::{LoginRequest, RegisterRequest, TokenResponse};
use crate::state::IssuerState;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the HTTP router for the issuer.
pub fn create_router(state: Arc<IssuerState>) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/register", post(handle_register))
        .route("/login", post(handle_login))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_root() -> Json<Value> {
    Json(json!({ "service": "auth-service", "status": "running" }))
}

async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn handle_register(
    State(state): State<Arc<IssuerState>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), IssuerError> {
    let Json(request) = body.map_err(|e| IssuerError::Validation(e.body_text()))?;
    let issued = state.issuer.register(request).await?;
    Ok((StatusCode::CREATED, Json(issued.into())))
}

async fn handle_login(
    State(state): State<Arc<IssuerState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, IssuerError> {
    let Json(request) = body.map_err(|e| IssuerError::Validation(e.body_text()))?;
    let issued = state.issuer.login(request).await?;
    Ok(Json(issued.into()))
}

//! HTTP surface of the users service.

use crate::auth::Caller;
use crate::error::UsersError;
use crate::service::DeleteResponse;
use crate::state::UsersState;
use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::get,
};
use gatehouse_core::{NewProfile, Profile, ProfileUpdate, UserId};
use gatehouse_policy::{ProfileOperation, authorize};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the HTTP router for the users service.
pub fn create_router(state: Arc<UsersState>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/users", get(handle_list).post(handle_create))
        .route(
            "/users/{id}",
            get(handle_get).put(handle_update).delete(handle_delete),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "user-service" }))
}

fn user_id(path: Result<Path<UserId>, PathRejection>) -> Result<UserId, UsersError> {
    path.map(|Path(id)| id)
        .map_err(|e| UsersError::Validation(e.body_text()))
}

fn body<T>(json: Result<Json<T>, JsonRejection>) -> Result<T, UsersError> {
    json.map(|Json(value)| value)
        .map_err(|e| UsersError::Validation(e.body_text()))
}

async fn handle_list(
    Caller(caller): Caller,
    State(state): State<Arc<UsersState>>,
) -> Result<Json<Vec<Profile>>, UsersError> {
    Ok(Json(state.profiles.list(&caller).await?))
}

async fn handle_get(
    Caller(caller): Caller,
    State(state): State<Arc<UsersState>>,
    path: Result<Path<UserId>, PathRejection>,
) -> Result<Json<Profile>, UsersError> {
    let id = user_id(path)?;
    Ok(Json(state.profiles.get(&caller, id).await?))
}

async fn handle_create(
    Caller(caller): Caller,
    State(state): State<Arc<UsersState>>,
    payload: Result<Json<NewProfile>, JsonRejection>,
) -> Result<(StatusCode, Json<Profile>), UsersError> {
    // Policy before payload validation.
    authorize(&caller, ProfileOperation::Create)?;
    let profile = body(payload)?;
    let created = state.profiles.create(&caller, profile).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn handle_update(
    Caller(caller): Caller,
    State(state): State<Arc<UsersState>>,
    path: Result<Path<UserId>, PathRejection>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<Profile>, UsersError> {
    let id = user_id(path)?;
    authorize(&caller, ProfileOperation::Update(id))?;
    let update = body(payload)?;
    Ok(Json(state.profiles.update(&caller, id, update).await?))
}

async fn handle_delete(
    Caller(caller): Caller,
    State(state): State<Arc<UsersState>>,
    path: Result<Path<UserId>, PathRejection>,
) -> Result<Json<DeleteResponse>, UsersError> {
    let id = user_id(path)?;
    Ok(Json(state.profiles.delete(&caller, id).await?))
}

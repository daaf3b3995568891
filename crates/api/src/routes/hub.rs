//! Read-only passthrough routes to the Hub registry.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::services::map_hub_error;
use crate::AppState;

use super::error_response;

/// Creates the Hub passthrough routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hub/politicians/{id}", get(get_politician))
        .route("/hub/organizations", get(list_organizations))
}

/// GET `/hub/politicians/{id}` - Fetch a politician record from the
/// Hub.
async fn get_politician(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.hub.get_politician(id).await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => error_response(&map_hub_error(e)),
    }
}

/// GET `/hub/organizations` - List registered political organizations
/// from the Hub.
async fn list_organizations(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    match state.hub.get_organizations().await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => error_response(&map_hub_error(e)),
    }
}

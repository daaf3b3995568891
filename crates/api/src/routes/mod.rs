//! API route definitions.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum::Router;
use serde_json::json;
use tracing::error;

use polifund_shared::error::AppError;

use crate::AppState;

pub mod closures;
pub mod health;
pub mod hub;
pub mod journals;
pub mod verifications;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(closures::routes())
        .merge(journals::routes())
        .merge(hub::routes())
        .merge(verifications::routes())
}

/// Renders an application error as the standard error body.
pub(crate) fn error_response(error: &AppError) -> Response {
    let status = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %error, "Request failed");
    }

    (
        status,
        Json(json!({
            "error": error.error_code(),
            "message": error.to_string()
        })),
    )
        .into_response()
}

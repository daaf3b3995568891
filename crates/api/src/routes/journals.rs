//! Journal approval and resync routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::services::{ApprovalOutcome, ApprovalService};
use crate::AppState;

use super::error_response;

/// Creates the journal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journals/{id}/approve", post(approve_journal))
        .route("/journals/{id}/resync", post(resync_journal))
}

/// Response for approval and resync calls.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveResponse {
    /// Outcome summary.
    pub message: String,
    /// Whether the Hub received the journal in this call.
    pub synced: bool,
    /// The Hub's acknowledgement, when synced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_result: Option<Value>,
}

impl From<ApprovalOutcome> for ApproveResponse {
    fn from(outcome: ApprovalOutcome) -> Self {
        Self {
            message: outcome.message,
            synced: outcome.synced,
            sync_result: outcome.sync_result,
        }
    }
}

/// POST `/journals/{id}/approve` - Approve a journal and push it to
/// the Hub. Idempotent; Hub failures leave the approval committed and
/// are reported in the body.
async fn approve_journal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let service = ApprovalService::new(state.db.clone(), state.hub.clone());

    match service.approve_and_sync(id, auth.user_id()).await {
        Ok(outcome) => (StatusCode::OK, Json(ApproveResponse::from(outcome))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/journals/{id}/resync` - Re-push an approved journal after a
/// failed sync.
async fn resync_journal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let service = ApprovalService::new(state.db.clone(), state.hub.clone());

    match service.resync(id, auth.user_id()).await {
        Ok(outcome) => (StatusCode::OK, Json(ApproveResponse::from(outcome))).into_response(),
        Err(e) => error_response(&e),
    }
}

//! Fiscal-year closure routes: readiness check, execute, reopen,
//! status, and unlock petitions.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::services::{ClosureService, ExecuteClosureError, UnlockService};
use crate::AppState;

use super::error_response;

/// Creates the closure routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/closures/check", get(check_closure))
        .route("/closures/status", get(closure_status))
        .route("/closures/execute", post(execute_closure))
        .route("/closures/reopen", post(reopen_closure))
        .route(
            "/closures/unlock-request",
            post(create_unlock_request).get(unlock_request_status),
        )
}

/// Query parameters identifying one (organization, fiscal year).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearParams {
    /// Organization whose ledger is being checked. Accepts the short
    /// `org_id` query key as well.
    #[serde(alias = "org_id")]
    pub organization_id: Uuid,
    /// Fiscal year.
    pub year: i32,
}

/// Request body identifying one (organization, fiscal year).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRequest {
    /// Organization whose ledger is being transitioned.
    pub organization_id: Uuid,
    /// Fiscal year.
    pub year: i32,
}

/// Request body for filing an unlock petition.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRequestBody {
    /// Organization whose ledger is locked.
    pub organization_id: Uuid,
    /// Fiscal year to unlock.
    pub year: i32,
    /// Reason shown to the Hub administrator.
    pub reason: String,
}

/// Query parameters for the unlock status read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockStatusParams {
    /// Organization whose ledger to query. Accepts the short `org_id`
    /// query key as well.
    #[serde(alias = "org_id")]
    pub organization_id: Uuid,
}

/// GET `/closures/check` - Run the closure readiness check.
async fn check_closure(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<YearParams>,
) -> impl IntoResponse {
    let service = ClosureService::new(state.db.clone());

    match service.check(params.organization_id, params.year).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/closures/status` - Read the year status (open when no
/// closure row exists).
async fn closure_status(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<YearParams>,
) -> impl IntoResponse {
    let service = ClosureService::new(state.db.clone());

    match service.status(params.organization_id, params.year).await {
        Ok(status) => (
            StatusCode::OK,
            Json(json!({
                "organizationId": params.organization_id,
                "year": params.year,
                "status": status.as_str()
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/closures/execute` - Close the year after a passing check.
async fn execute_closure(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(body): Json<YearRequest>,
) -> impl IntoResponse {
    let service = ClosureService::new(state.db.clone());

    match service.execute(body.organization_id, body.year).await {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({
                "message": format!("Fiscal year {} closed", body.year),
                "check": result
            })),
        )
            .into_response(),
        Err(ExecuteClosureError::Blocked(result)) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "CONFLICT",
                "message": "Closure blocked by failing checks",
                "issues": result.issues,
                "summary": result.summary
            })),
        )
            .into_response(),
        Err(ExecuteClosureError::App(e)) => error_response(&e),
    }
}

/// POST `/closures/reopen` - Reopen a closed year.
async fn reopen_closure(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(body): Json<YearRequest>,
) -> impl IntoResponse {
    let service = ClosureService::new(state.db.clone());

    match service.reopen(body.organization_id, body.year).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "message": format!("Fiscal year {} reopened", body.year)
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/closures/unlock-request` - File an unlock petition with the
/// Hub.
async fn create_unlock_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UnlockRequestBody>,
) -> impl IntoResponse {
    let service = UnlockService::new(state.db.clone(), state.hub.clone());

    match service
        .request_unlock(body.organization_id, body.year, auth.user_id(), &body.reason)
        .await
    {
        Ok(request) => (StatusCode::OK, Json(request)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/closures/unlock-request` - Read the Hub's unlock status for
/// an organization's ledger.
async fn unlock_request_status(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<UnlockStatusParams>,
) -> impl IntoResponse {
    let service = UnlockService::new(state.db.clone(), state.hub.clone());

    match service.check_status(params.organization_id).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use chrono::{NaiveDate, Utc};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use serde_json::Value;
    use tower::ServiceExt;

    use polifund_db::entities::sea_orm_active_enums::JournalStatus;
    use polifund_db::entities::{journal_entries, journals, ledger_year_closures, media_assets};
    use polifund_shared::hub::{
        HubApi, HubError, OrganizationManagerVerificationInput, PoliticianVerificationInput,
        SyncJournalInput, SyncLedgerInput, UnlockRequest, UnlockRequestInput, UnlockStatus,
    };

    use crate::middleware::auth::USER_ID_HEADER;
    use crate::{AppState, create_router};

    /// Hub double for routes that never reach the Hub.
    struct NullHub;

    #[async_trait::async_trait]
    impl HubApi for NullHub {
        async fn create_unlock_request(
            &self,
            _input: UnlockRequestInput,
        ) -> Result<UnlockRequest, HubError> {
            Err(HubError::Transport("not configured".to_string()))
        }

        async fn check_unlock_status(&self, _ledger_id: Uuid) -> Result<UnlockStatus, HubError> {
            Err(HubError::Transport("not configured".to_string()))
        }

        async fn sync_ledger(&self, _input: SyncLedgerInput) -> Result<Value, HubError> {
            Err(HubError::Transport("not configured".to_string()))
        }

        async fn sync_journals(&self, _input: Vec<SyncJournalInput>) -> Result<Value, HubError> {
            Err(HubError::Transport("not configured".to_string()))
        }

        async fn get_politician(&self, _politician_id: Uuid) -> Result<Value, HubError> {
            Err(HubError::Transport("not configured".to_string()))
        }

        async fn get_organizations(&self) -> Result<Value, HubError> {
            Err(HubError::Transport("not configured".to_string()))
        }

        async fn create_politician_verification(
            &self,
            _input: PoliticianVerificationInput,
        ) -> Result<Value, HubError> {
            Err(HubError::Transport("not configured".to_string()))
        }

        async fn create_organization_manager_verification(
            &self,
            _input: OrganizationManagerVerificationInput,
        ) -> Result<Value, HubError> {
            Err(HubError::Transport("not configured".to_string()))
        }
    }

    fn app(db: DatabaseConnection) -> axum::Router {
        create_router(AppState {
            db: Arc::new(db),
            hub: Arc::new(NullHub),
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn draft_journal(org_id: Uuid) -> journals::Model {
        journals::Model {
            id: Uuid::now_v7(),
            organization_id: Some(org_id),
            election_id: None,
            journal_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            description: "unpaid invoice".to_string(),
            status: JournalStatus::Draft,
            contact_id: None,
            approved_by: None,
            approved_at: None,
            created_at: Utc::now().fixed_offset(),
        }
    }

    #[tokio::test]
    async fn test_check_without_identity_is_unauthorized() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let org_id = Uuid::now_v7();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/v1/closures/check?organizationId={org_id}&year=2024"
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_check_rejects_non_four_digit_year() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let org_id = Uuid::now_v7();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/v1/closures/check?organizationId={org_id}&year=99"
                    ))
                    .header(USER_ID_HEADER, Uuid::now_v7().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_check_reports_issues_with_wire_names() {
        let org_id = Uuid::now_v7();
        let journal = draft_journal(org_id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![journal.clone()]])
            .append_query_results([vec![journal_entries::Model {
                id: Uuid::now_v7(),
                journal_id: journal.id,
                account_code: "EXP_office".to_string(),
                debit_amount: 500,
                credit_amount: 0,
            }]])
            .append_query_results([Vec::<media_assets::Model>::new()])
            .into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/v1/closures/check?organizationId={org_id}&year=2024"
                    ))
                    .header(USER_ID_HEADER, Uuid::now_v7().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["canClose"], false);
        assert_eq!(body["summary"]["totalJournals"], 1);
        assert_eq!(body["issues"][0]["type"], "error");
    }

    #[tokio::test]
    async fn test_execute_blocked_returns_conflict_with_issue_list() {
        let org_id = Uuid::now_v7();
        let journal = draft_journal(org_id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![journal.clone()]])
            .append_query_results([vec![journal_entries::Model {
                id: Uuid::now_v7(),
                journal_id: journal.id,
                account_code: "EXP_office".to_string(),
                debit_amount: 500,
                credit_amount: 0,
            }]])
            .append_query_results([Vec::<media_assets::Model>::new()])
            .into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/closures/execute")
                    .header(USER_ID_HEADER, Uuid::now_v7().to_string())
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&serde_json::json!({
                            "organizationId": org_id,
                            "year": 2024
                        }))
                        .unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["error"], "CONFLICT");
        assert!(!body["issues"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reopen_of_open_year_names_actual_status() {
        let org_id = Uuid::now_v7();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([Vec::<ledger_year_closures::Model>::new()])
            .into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/closures/reopen")
                    .header(USER_ID_HEADER, Uuid::now_v7().to_string())
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&serde_json::json!({
                            "organizationId": org_id,
                            "year": 2024
                        }))
                        .unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("open"));
    }

    #[tokio::test]
    async fn test_check_accepts_org_id_query_key() {
        let org_id = Uuid::now_v7();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<journals::Model>::new()])
            .into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/closures/check?org_id={org_id}&year=2024"))
                    .header(USER_ID_HEADER, Uuid::now_v7().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["canClose"], true);
        assert_eq!(body["summary"]["totalJournals"], 0);
    }

    #[tokio::test]
    async fn test_status_of_unclosed_year_is_open() {
        let org_id = Uuid::now_v7();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<ledger_year_closures::Model>::new()])
            .into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/v1/closures/status?organizationId={org_id}&year=2024"
                    ))
                    .header(USER_ID_HEADER, Uuid::now_v7().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "open");
    }
}

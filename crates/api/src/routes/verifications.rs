//! Identity verification routes, forwarded to the Hub for moderation.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use uuid::Uuid;

use polifund_shared::hub::{OrganizationManagerVerificationInput, PoliticianVerificationInput};

use crate::middleware::AuthUser;
use crate::services::map_hub_error;
use crate::AppState;

use super::error_response;

/// Creates the verification routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/verifications/politician", post(verify_politician))
        .route(
            "/verifications/organization-manager",
            post(verify_organization_manager),
        )
}

/// Request body for a politician verification.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliticianVerificationRequest {
    /// Politician's registered name.
    pub name: String,
    /// Official contact email.
    pub official_email: String,
    /// Official website URL.
    pub official_url: Option<String>,
    /// Party affiliation.
    pub party: Option<String>,
    /// Hub politician record to link, if known.
    pub politician_id: Option<Uuid>,
}

/// Request body for an organization manager verification.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationManagerVerificationRequest {
    /// Hub organization record.
    pub organization_id: Uuid,
    /// Organization's registered name.
    pub organization_name: String,
    /// Official contact email.
    pub official_email: String,
    /// Requester's role within the organization.
    pub role_in_organization: String,
}

/// POST `/verifications/politician` - File a politician verification
/// request with the Hub.
async fn verify_politician(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<PoliticianVerificationRequest>,
) -> impl IntoResponse {
    let input = PoliticianVerificationInput {
        ledger_user_id: auth.user_id(),
        name: body.name,
        official_email: body.official_email,
        official_url: body.official_url,
        party: body.party,
        politician_id: body.politician_id,
    };

    match state.hub.create_politician_verification(input).await {
        Ok(value) => (StatusCode::CREATED, Json(value)).into_response(),
        Err(e) => error_response(&map_hub_error(e)),
    }
}

/// POST `/verifications/organization-manager` - File an organization
/// manager verification request with the Hub.
async fn verify_organization_manager(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<OrganizationManagerVerificationRequest>,
) -> impl IntoResponse {
    let input = OrganizationManagerVerificationInput {
        ledger_user_id: auth.user_id(),
        organization_id: body.organization_id,
        organization_name: body.organization_name,
        official_email: body.official_email,
        role_in_organization: body.role_in_organization,
    };

    match state
        .hub
        .create_organization_manager_verification(input)
        .await
    {
        Ok(value) => (StatusCode::CREATED, Json(value)).into_response(),
        Err(e) => error_response(&map_hub_error(e)),
    }
}

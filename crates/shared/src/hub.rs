//! Client for the Hub, the external authoritative registry.
//!
//! The Hub aggregates approved ledger data and adjudicates unlock
//! requests for locked fiscal years. All calls are keyed by external
//! identifiers (`ledger_source_id`), never local primary keys.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::config::HubConfig;

/// The designated test identity. Data created by this user is tagged
/// `is_test` so the Hub keeps it out of public aggregates.
pub const TEST_USER_ID: Uuid = Uuid::from_u128(1);

/// Returns true if the given user is the designated test identity.
#[must_use]
pub fn is_test_user(user_id: Uuid) -> bool {
    user_id == TEST_USER_ID
}

/// Hub client errors.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// A pending unlock request already exists for this (ledger, year).
    #[error("A pending unlock request already exists")]
    PendingUnlockExists,

    /// The Hub rejected the request.
    #[error("Hub rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the Hub.
        status: u16,
        /// Error message from the Hub response body.
        message: String,
    },

    /// Transport-level failure (connect, timeout, TLS).
    #[error("Hub request failed: {0}")]
    Transport(String),

    /// The Hub response could not be decoded.
    #[error("Failed to decode Hub response: {0}")]
    Decode(String),
}

/// Ledger kind as the Hub classifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerType {
    /// A political organization's ledger.
    Organization,
    /// An election campaign's ledger.
    Election,
}

/// Payload for creating an unlock request.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockRequestInput {
    /// External ledger identifier.
    pub ledger_id: Uuid,
    /// Ledger kind.
    pub ledger_type: LedgerType,
    /// Fiscal year to unlock.
    pub fiscal_year: i32,
    /// Requesting user.
    pub requested_by_user_id: Uuid,
    /// Requesting user's email, shown to the Hub administrator.
    pub requested_by_email: String,
    /// Reason text (trimmed, at least 10 characters).
    pub reason: String,
}

/// An unlock request as returned by the Hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockRequest {
    /// Hub-side request identifier.
    pub id: Uuid,
    /// External ledger identifier.
    pub ledger_id: Uuid,
    /// Fiscal year the request targets.
    pub fiscal_year: i32,
    /// Request status (e.g., "pending", "approved", "rejected").
    pub status: String,
}

/// Unlock status for a ledger, read fresh from the Hub on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockStatus {
    /// Whether an unlock request is currently pending.
    pub pending: bool,
    /// Fiscal year of the pending request, if any.
    #[serde(default)]
    pub fiscal_year: Option<i32>,
    /// Status string of the most recent request, if any.
    #[serde(default)]
    pub status: Option<String>,
}

/// One debit/credit line in a synced journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEntryInput {
    /// Account code (`REV_*` revenue, `EXP_*` expense).
    pub account_code: String,
    /// Debit amount in yen.
    pub debit_amount: i64,
    /// Credit amount in yen.
    pub credit_amount: i64,
}

/// An approved journal in the Hub's representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncJournalInput {
    /// Local journal identifier, kept for dedup on the Hub side.
    pub journal_source_id: Uuid,
    /// External ledger identifier (join key with the aggregate).
    pub ledger_source_id: Uuid,
    /// Journal date (YYYY-MM-DD).
    pub journal_date: chrono::NaiveDate,
    /// Free-text description, preserved exactly.
    pub description: String,
    /// Counterparty display name, already privacy-redacted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    /// Entry lines, preserved exactly.
    pub entries: Vec<SyncEntryInput>,
    /// True when the originating user is the designated test identity.
    pub is_test: bool,
}

/// Recomputed ledger aggregate pushed alongside each approved journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncLedgerInput {
    /// External ledger identifier.
    pub ledger_source_id: Uuid,
    /// Owning politician.
    pub politician_id: Uuid,
    /// Owning organization, if this is an organization ledger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Uuid>,
    /// Owning election, if this is an election ledger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub election_id: Option<Uuid>,
    /// Fiscal year the aggregate covers.
    pub fiscal_year: i32,
    /// Total income: credit amounts on `REV_*` accounts.
    pub total_income: i64,
    /// Total expense: debit amounts on `EXP_*` accounts.
    pub total_expense: i64,
    /// Number of approved journals.
    pub journal_count: i64,
    /// True when the ledger belongs to the designated test identity.
    pub is_test: bool,
}

/// Payload for a politician verification request.
#[derive(Debug, Clone, Serialize)]
pub struct PoliticianVerificationInput {
    /// Local user requesting verification.
    pub ledger_user_id: Uuid,
    /// Politician's registered name.
    pub name: String,
    /// Official contact email.
    pub official_email: String,
    /// Official website URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
    /// Party affiliation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    /// Hub politician record to link, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub politician_id: Option<Uuid>,
}

/// Payload for an organization manager verification request.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationManagerVerificationInput {
    /// Local user requesting verification.
    pub ledger_user_id: Uuid,
    /// Hub organization record.
    pub organization_id: Uuid,
    /// Organization's registered name.
    pub organization_name: String,
    /// Official contact email.
    pub official_email: String,
    /// Requester's role within the organization.
    pub role_in_organization: String,
}

/// Operations the Hub exposes to this service.
///
/// Implemented by [`HubClient`] for production; tests substitute a
/// recording double.
#[async_trait]
pub trait HubApi: Send + Sync {
    /// Creates a moderated unlock request for a locked fiscal year.
    async fn create_unlock_request(
        &self,
        input: UnlockRequestInput,
    ) -> Result<UnlockRequest, HubError>;

    /// Reads the current unlock status for a ledger. Never cached.
    async fn check_unlock_status(&self, ledger_id: Uuid) -> Result<UnlockStatus, HubError>;

    /// Pushes a recomputed ledger aggregate.
    async fn sync_ledger(&self, input: SyncLedgerInput) -> Result<Value, HubError>;

    /// Pushes approved journals.
    async fn sync_journals(&self, input: Vec<SyncJournalInput>) -> Result<Value, HubError>;

    /// Fetches a politician record.
    async fn get_politician(&self, politician_id: Uuid) -> Result<Value, HubError>;

    /// Lists registered political organizations.
    async fn get_organizations(&self) -> Result<Value, HubError>;

    /// Creates a politician verification request.
    async fn create_politician_verification(
        &self,
        input: PoliticianVerificationInput,
    ) -> Result<Value, HubError>;

    /// Creates an organization manager verification request.
    async fn create_organization_manager_verification(
        &self,
        input: OrganizationManagerVerificationInput,
    ) -> Result<Value, HubError>;
}

/// HTTP client for the Hub API.
#[derive(Clone)]
pub struct HubClient {
    config: HubConfig,
    http: reqwest::Client,
}

/// Shape of a Hub error response body.
#[derive(Debug, Deserialize)]
struct HubErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl HubClient {
    /// Creates a new Hub client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: HubConfig) -> Result<Self, HubError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HubError::Transport(e.to_string()))?;
        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts a non-success response into a `HubError`.
    async fn error_from_response(response: reqwest::Response) -> HubError {
        let status = response.status().as_u16();
        let message = match response.json::<HubErrorBody>().await {
            Ok(body) => body
                .error
                .or(body.message)
                .unwrap_or_else(|| "unknown error".to_string()),
            Err(_) => "unknown error".to_string(),
        };

        // The at-most-one-pending-request invariant is owned by the Hub;
        // recognize its rejection so callers can surface a 409.
        if message.contains("pending unlock request already exists") {
            return HubError::PendingUnlockExists;
        }

        HubError::Rejected { status, message }
    }

    async fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, HubError> {
        debug!(path, "Hub POST");
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| HubError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| HubError::Decode(e.to_string()))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, HubError> {
        debug!(path, "Hub GET");
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| HubError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| HubError::Decode(e.to_string()))
    }
}

#[async_trait]
impl HubApi for HubClient {
    async fn create_unlock_request(
        &self,
        input: UnlockRequestInput,
    ) -> Result<UnlockRequest, HubError> {
        self.post_json("/unlock-requests", &input).await
    }

    async fn check_unlock_status(&self, ledger_id: Uuid) -> Result<UnlockStatus, HubError> {
        self.get_json(&format!("/unlock-requests/status?ledger_id={ledger_id}"))
            .await
    }

    async fn sync_ledger(&self, input: SyncLedgerInput) -> Result<Value, HubError> {
        self.post_json("/ledgers/sync", &input).await
    }

    async fn sync_journals(&self, input: Vec<SyncJournalInput>) -> Result<Value, HubError> {
        self.post_json("/journals/sync", &input).await
    }

    async fn get_politician(&self, politician_id: Uuid) -> Result<Value, HubError> {
        self.get_json(&format!("/politicians/{politician_id}")).await
    }

    async fn get_organizations(&self) -> Result<Value, HubError> {
        self.get_json("/organizations").await
    }

    async fn create_politician_verification(
        &self,
        input: PoliticianVerificationInput,
    ) -> Result<Value, HubError> {
        self.post_json("/verifications/politician", &input).await
    }

    async fn create_organization_manager_verification(
        &self,
        input: OrganizationManagerVerificationInput,
    ) -> Result<Value, HubError> {
        self.post_json("/verifications/organization-manager", &input)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_user_detection() {
        assert!(is_test_user(TEST_USER_ID));
        assert!(!is_test_user(Uuid::now_v7()));
    }

    #[test]
    fn test_test_user_id_matches_fixture_value() {
        assert_eq!(
            TEST_USER_ID.to_string(),
            "00000000-0000-0000-0000-000000000001"
        );
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = HubClient::new(HubConfig {
            base_url: "https://hub.example.org/api/".to_string(),
            api_key: "key".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            client.url("/journals/sync"),
            "https://hub.example.org/api/journals/sync"
        );
    }

    #[test]
    fn test_ledger_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LedgerType::Organization).unwrap(),
            "\"organization\""
        );
        assert_eq!(
            serde_json::to_string(&LedgerType::Election).unwrap(),
            "\"election\""
        );
    }

    #[test]
    fn test_sync_journal_input_omits_absent_contact() {
        let input = SyncJournalInput {
            journal_source_id: Uuid::nil(),
            ledger_source_id: Uuid::nil(),
            journal_date: chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            description: "donation".to_string(),
            contact_name: None,
            entries: vec![],
            is_test: false,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("contact_name").is_none());
    }
}

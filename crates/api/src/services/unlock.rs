//! Unlock request coordinator.
//!
//! A locked fiscal year can only be reopened by the Hub, so unlocking
//! is a moderated petition: validate locally, then forward to the Hub,
//! which owns the at-most-one-pending invariant. Status reads pass
//! through uncached so a just-approved request is visible immediately.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;
use uuid::Uuid;

use polifund_shared::error::AppError;
use polifund_shared::hub::{
    HubApi, LedgerType, UnlockRequest, UnlockRequestInput, UnlockStatus,
};
use polifund_db::repositories::{LedgerRepository, OrganizationRepository};

use super::{map_hub_error, map_ledger_error, map_organization_error};

/// Minimum length of a trimmed unlock reason, in characters.
const MIN_REASON_CHARS: usize = 10;

/// Unlock request coordinator.
#[derive(Clone)]
pub struct UnlockService {
    organizations: OrganizationRepository,
    ledgers: LedgerRepository,
    hub: Arc<dyn HubApi>,
}

impl UnlockService {
    /// Creates a new unlock service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, hub: Arc<dyn HubApi>) -> Self {
        Self {
            organizations: OrganizationRepository::new(db.clone()),
            ledgers: LedgerRepository::new(db),
            hub,
        }
    }

    /// Files an unlock request for a locked fiscal year with the Hub.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a too-short reason, `NotFound` for an
    /// unknown organization or one without a ledger, `Forbidden` when
    /// the caller does not own the organization, and `Conflict` when
    /// the Hub reports a pending request for this ledger already.
    pub async fn request_unlock(
        &self,
        organization_id: Uuid,
        year: i32,
        requester_id: Uuid,
        reason: &str,
    ) -> Result<UnlockRequest, AppError> {
        let reason = reason.trim();
        if reason.chars().count() < MIN_REASON_CHARS {
            return Err(AppError::Validation(format!(
                "Reason must be at least {MIN_REASON_CHARS} characters"
            )));
        }

        let organization = self
            .organizations
            .find_by_id(organization_id)
            .await
            .map_err(map_organization_error)?;
        if organization.owner_user_id != requester_id {
            return Err(AppError::Forbidden(
                "Only the organization owner can request an unlock".to_string(),
            ));
        }

        let ledger = self.ledger_for_organization(organization_id).await?;

        let email = self
            .organizations
            .email_for_user(requester_id)
            .await
            .map_err(map_organization_error)?;

        let request = self
            .hub
            .create_unlock_request(UnlockRequestInput {
                ledger_id: ledger.id,
                ledger_type: LedgerType::Organization,
                fiscal_year: year,
                requested_by_user_id: requester_id,
                requested_by_email: email,
                reason: reason.to_string(),
            })
            .await
            .map_err(map_hub_error)?;

        info!(
            organization_id = %organization_id,
            ledger_id = %ledger.id,
            year,
            "Unlock request filed with the Hub"
        );
        Ok(request)
    }

    /// Reads the current unlock status for an organization's ledger,
    /// straight from the Hub.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown organization or one without a
    /// ledger, and `Upstream` when the Hub call fails.
    pub async fn check_status(&self, organization_id: Uuid) -> Result<UnlockStatus, AppError> {
        self.organizations
            .find_by_id(organization_id)
            .await
            .map_err(map_organization_error)?;
        let ledger = self.ledger_for_organization(organization_id).await?;

        self.hub
            .check_unlock_status(ledger.id)
            .await
            .map_err(map_hub_error)
    }

    async fn ledger_for_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<polifund_db::entities::ledgers::Model, AppError> {
        self.ledgers
            .resolve_for_journal(Some(organization_id), None)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No ledger registered for organization: {organization_id}"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::Value;
    use std::sync::Mutex;

    use polifund_db::entities::{ledgers, political_organizations, profiles};
    use polifund_shared::hub::{
        HubError, OrganizationManagerVerificationInput, PoliticianVerificationInput,
        SyncJournalInput, SyncLedgerInput,
    };

    #[derive(Default)]
    struct RecordingHub {
        pending_exists: bool,
        unlock_requests: Mutex<Vec<UnlockRequestInput>>,
        status_checks: Mutex<Vec<Uuid>>,
    }

    #[async_trait::async_trait]
    impl HubApi for RecordingHub {
        async fn create_unlock_request(
            &self,
            input: UnlockRequestInput,
        ) -> Result<UnlockRequest, HubError> {
            if self.pending_exists {
                return Err(HubError::PendingUnlockExists);
            }
            let request = UnlockRequest {
                id: Uuid::now_v7(),
                ledger_id: input.ledger_id,
                fiscal_year: input.fiscal_year,
                status: "pending".to_string(),
            };
            self.unlock_requests.lock().unwrap().push(input);
            Ok(request)
        }

        async fn check_unlock_status(&self, ledger_id: Uuid) -> Result<UnlockStatus, HubError> {
            self.status_checks.lock().unwrap().push(ledger_id);
            Ok(UnlockStatus {
                pending: true,
                fiscal_year: Some(2024),
                status: Some("pending".to_string()),
            })
        }

        async fn sync_ledger(&self, _input: SyncLedgerInput) -> Result<Value, HubError> {
            unreachable!("unlock flow never syncs ledgers")
        }

        async fn sync_journals(&self, _input: Vec<SyncJournalInput>) -> Result<Value, HubError> {
            unreachable!("unlock flow never syncs journals")
        }

        async fn get_politician(&self, _politician_id: Uuid) -> Result<Value, HubError> {
            unreachable!()
        }

        async fn get_organizations(&self) -> Result<Value, HubError> {
            unreachable!()
        }

        async fn create_politician_verification(
            &self,
            _input: PoliticianVerificationInput,
        ) -> Result<Value, HubError> {
            unreachable!()
        }

        async fn create_organization_manager_verification(
            &self,
            _input: OrganizationManagerVerificationInput,
        ) -> Result<Value, HubError> {
            unreachable!()
        }
    }

    fn organization_model(id: Uuid, owner: Uuid) -> political_organizations::Model {
        political_organizations::Model {
            id,
            name: "Friends of the River".to_string(),
            owner_user_id: owner,
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn ledger_model(org_id: Uuid) -> ledgers::Model {
        ledgers::Model {
            id: Uuid::now_v7(),
            politician_id: Uuid::now_v7(),
            organization_id: Some(org_id),
            election_id: None,
            fiscal_year: Some(2024),
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn profile_model(id: Uuid, email: &str) -> profiles::Model {
        profiles::Model {
            id,
            email: email.to_string(),
            created_at: Utc::now().fixed_offset(),
        }
    }

    #[tokio::test]
    async fn test_short_reason_is_rejected_before_any_lookup() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let hub = Arc::new(RecordingHub::default());
        let service = UnlockService::new(Arc::new(db), hub.clone());

        let err = service
            .request_unlock(Uuid::now_v7(), 2024, Uuid::now_v7(), "  too short  ")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(hub.unlock_requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_owner_is_forbidden() {
        let org_id = Uuid::now_v7();
        let owner = Uuid::now_v7();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![organization_model(org_id, owner)]])
            .into_connection();

        let hub = Arc::new(RecordingHub::default());
        let service = UnlockService::new(Arc::new(db), hub.clone());

        let err = service
            .request_unlock(org_id, 2024, Uuid::now_v7(), "deadline extension needed")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(hub.unlock_requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_request_forwards_trimmed_reason_and_ledger_key() {
        let org_id = Uuid::now_v7();
        let owner = Uuid::now_v7();
        let ledger = ledger_model(org_id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![organization_model(org_id, owner)]])
            .append_query_results([vec![ledger.clone()]])
            .append_query_results([vec![profile_model(owner, "owner@example.org")]])
            .into_connection();

        let hub = Arc::new(RecordingHub::default());
        let service = UnlockService::new(Arc::new(db), hub.clone());

        let request = service
            .request_unlock(org_id, 2023, owner, "  correction of a filing error  ")
            .await
            .unwrap();

        assert_eq!(request.status, "pending");
        assert_eq!(request.fiscal_year, 2023);

        let sent = hub.unlock_requests.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].ledger_id, ledger.id);
        assert_eq!(sent[0].reason, "correction of a filing error");
        assert_eq!(sent[0].requested_by_email, "owner@example.org");
        assert_eq!(sent[0].ledger_type, LedgerType::Organization);
    }

    #[tokio::test]
    async fn test_duplicate_pending_maps_to_conflict() {
        let org_id = Uuid::now_v7();
        let owner = Uuid::now_v7();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![organization_model(org_id, owner)]])
            .append_query_results([vec![ledger_model(org_id)]])
            .append_query_results([vec![profile_model(owner, "owner@example.org")]])
            .into_connection();

        let hub = Arc::new(RecordingHub {
            pending_exists: true,
            ..RecordingHub::default()
        });
        let service = UnlockService::new(Arc::new(db), hub);

        let err = service
            .request_unlock(org_id, 2024, owner, "deadline extension needed")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_status_check_targets_resolved_ledger() {
        let org_id = Uuid::now_v7();
        let ledger = ledger_model(org_id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![organization_model(org_id, Uuid::now_v7())]])
            .append_query_results([vec![ledger.clone()]])
            .into_connection();

        let hub = Arc::new(RecordingHub::default());
        let service = UnlockService::new(Arc::new(db), hub.clone());

        let status = service.check_status(org_id).await.unwrap();
        assert!(status.pending);
        assert_eq!(*hub.status_checks.lock().unwrap(), vec![ledger.id]);
    }

    #[tokio::test]
    async fn test_organization_without_ledger_is_not_found() {
        let org_id = Uuid::now_v7();
        let owner = Uuid::now_v7();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![organization_model(org_id, owner)]])
            .append_query_results([Vec::<ledgers::Model>::new()])
            .into_connection();

        let hub = Arc::new(RecordingHub::default());
        let service = UnlockService::new(Arc::new(db), hub);

        let err = service
            .request_unlock(org_id, 2024, owner, "deadline extension needed")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}

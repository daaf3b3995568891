//! Approval/sync orchestrator.
//!
//! Drives the end-to-end flow: approve a journal locally, recompute
//! the owning ledger's aggregate, and push both to the Hub. Local
//! durability wins over cross-system atomicity: a Hub failure after
//! the approval write is reported as "approved but not synced" and
//! recovered later through the resync entry point, never by rolling
//! back the approval.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use polifund_core::journal::JournalStatus;
use polifund_core::sync::{compute_aggregate, transform_journal};
use polifund_db::repositories::journal::{to_core_contact, to_core_entry, to_core_journal};
use polifund_db::repositories::{
    ApproveOutcome, ClosureRepository, JournalRepository, JournalWithRelations, LedgerRepository,
};
use polifund_shared::error::AppError;
use polifund_shared::hub::{HubApi, SyncLedgerInput, is_test_user};

use super::{map_closure_error, map_journal_error, map_ledger_error};

/// Result of an approval or resync call.
#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    /// Human-readable outcome summary.
    pub message: String,
    /// Whether the Hub received the journal in this call.
    pub synced: bool,
    /// The Hub's acknowledgement, when synced.
    pub sync_result: Option<Value>,
}

/// How the Hub push part of the flow ended.
enum SyncStatus {
    /// Aggregate and journal both pushed.
    Synced(Value),
    /// No sync context (journal has no resolvable ledger).
    Skipped(String),
    /// A Hub call failed; local state is untouched.
    Failed(String),
}

/// Approval/sync orchestrator.
#[derive(Clone)]
pub struct ApprovalService {
    journals: JournalRepository,
    ledgers: LedgerRepository,
    closures: ClosureRepository,
    hub: Arc<dyn HubApi>,
}

impl ApprovalService {
    /// Creates a new approval service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, hub: Arc<dyn HubApi>) -> Self {
        Self {
            journals: JournalRepository::new(db.clone()),
            ledgers: LedgerRepository::new(db.clone()),
            closures: ClosureRepository::new(db),
            hub,
        }
    }

    /// Approves a journal and pushes it to the Hub.
    ///
    /// Approval is idempotent: a journal that is already approved (or
    /// loses the conditional update to a concurrent approval) yields
    /// `synced: false` without any Hub traffic.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown journal, `Conflict` when the
    /// journal's fiscal year no longer accepts writes, and `Database`
    /// when the approval write fails; Hub failures are reported in
    /// the outcome, not as errors.
    pub async fn approve_and_sync(
        &self,
        journal_id: Uuid,
        approver_id: Uuid,
    ) -> Result<ApprovalOutcome, AppError> {
        let fetched = self
            .journals
            .find_with_relations(journal_id)
            .await
            .map_err(map_journal_error)?;

        if JournalStatus::from(fetched.journal.status.clone()) == JournalStatus::Approved {
            return Ok(ApprovalOutcome {
                message: "Already approved".to_string(),
                synced: false,
                sync_result: None,
            });
        }

        // A closed or locked fiscal year rejects the approval before
        // any write happens.
        if let Some(org_id) = fetched.journal.organization_id {
            let year = fetched.journal.journal_date.year();
            let status = self
                .closures
                .get_status(org_id, year)
                .await
                .map_err(map_closure_error)?;
            if !status.accepts_writes() {
                return Err(AppError::Conflict(format!(
                    "Fiscal year {year} is {}",
                    status.as_str()
                )));
            }
        }

        // Status-guarded write; a failure here aborts the request with
        // no partial approval state.
        let outcome = self
            .journals
            .approve(journal_id, approver_id)
            .await
            .map_err(map_journal_error)?;

        if outcome == ApproveOutcome::AlreadyApproved {
            // A concurrent approval won the conditional update.
            return Ok(ApprovalOutcome {
                message: "Already approved".to_string(),
                synced: false,
                sync_result: None,
            });
        }

        info!(journal_id = %journal_id, approver_id = %approver_id, "Journal approved");

        match self.push_to_hub(&fetched, approver_id).await? {
            SyncStatus::Synced(sync_result) => Ok(ApprovalOutcome {
                message: "Approved and synced".to_string(),
                synced: true,
                sync_result: Some(sync_result),
            }),
            SyncStatus::Skipped(reason) => Ok(ApprovalOutcome {
                message: format!("Approved but not synced ({reason})"),
                synced: false,
                sync_result: None,
            }),
            SyncStatus::Failed(reason) => Ok(ApprovalOutcome {
                message: format!("Approved but sync failed: {reason}"),
                synced: false,
                sync_result: None,
            }),
        }
    }

    /// Re-pushes an already-approved journal and its ledger aggregate
    /// to the Hub, recovering from an earlier failed sync.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a draft journal, `NotFound` for an
    /// unknown one, and `Database` on store failure.
    pub async fn resync(
        &self,
        journal_id: Uuid,
        caller_id: Uuid,
    ) -> Result<ApprovalOutcome, AppError> {
        let fetched = self
            .journals
            .find_with_relations(journal_id)
            .await
            .map_err(map_journal_error)?;

        if JournalStatus::from(fetched.journal.status.clone()) != JournalStatus::Approved {
            return Err(AppError::Validation(
                "Only approved journals can be resynced".to_string(),
            ));
        }

        match self.push_to_hub(&fetched, caller_id).await? {
            SyncStatus::Synced(sync_result) => Ok(ApprovalOutcome {
                message: "Synced".to_string(),
                synced: true,
                sync_result: Some(sync_result),
            }),
            SyncStatus::Skipped(reason) => Ok(ApprovalOutcome {
                message: format!("Not synced ({reason})"),
                synced: false,
                sync_result: None,
            }),
            SyncStatus::Failed(reason) => Ok(ApprovalOutcome {
                message: format!("Sync failed: {reason}"),
                synced: false,
                sync_result: None,
            }),
        }
    }

    /// Pushes the recomputed ledger aggregate and the transformed
    /// journal to the Hub.
    ///
    /// The aggregate is read after the approval transition so the
    /// just-approved journal is included in its own ledger's totals.
    async fn push_to_hub(
        &self,
        fetched: &JournalWithRelations,
        user_id: Uuid,
    ) -> Result<SyncStatus, AppError> {
        let ledger = self
            .ledgers
            .resolve_for_journal(fetched.journal.organization_id, fetched.journal.election_id)
            .await
            .map_err(map_ledger_error)?;

        let Some(ledger) = ledger else {
            warn!(journal_id = %fetched.journal.id, "Journal has no associated ledger, skipping sync");
            return Ok(SyncStatus::Skipped("no ledger".to_string()));
        };

        let entry_sets = self
            .journals
            .approved_entry_sets(ledger.organization_id, ledger.election_id)
            .await
            .map_err(map_journal_error)?;
        let aggregate = compute_aggregate(&entry_sets);

        let is_test = is_test_user(user_id);
        let ledger_input = SyncLedgerInput {
            ledger_source_id: ledger.id,
            politician_id: ledger.politician_id,
            organization_id: ledger.organization_id,
            election_id: ledger.election_id,
            fiscal_year: ledger.fiscal_year.unwrap_or_else(|| Utc::now().year()),
            total_income: aggregate.total_income,
            total_expense: aggregate.total_expense,
            journal_count: aggregate.journal_count,
            is_test,
        };

        if let Err(e) = self.hub.sync_ledger(ledger_input).await {
            warn!(ledger_id = %ledger.id, error = %e, "Ledger aggregate push failed");
            return Ok(SyncStatus::Failed(e.to_string()));
        }

        let journal = to_core_journal(fetched.journal.clone());
        let entries: Vec<_> = fetched
            .entries
            .iter()
            .cloned()
            .map(to_core_entry)
            .collect();
        let contact = fetched.contact.clone().map(to_core_contact);
        let journal_input =
            transform_journal(&journal, &entries, contact.as_ref(), ledger.id, is_test);

        match self.hub.sync_journals(vec![journal_input]).await {
            Ok(sync_result) => {
                info!(journal_id = %journal.id, ledger_id = %ledger.id, "Journal synced to Hub");
                Ok(SyncStatus::Synced(sync_result))
            }
            Err(e) => {
                warn!(journal_id = %journal.id, error = %e, "Journal push failed");
                Ok(SyncStatus::Failed(e.to_string()))
            }
        }
    }
}

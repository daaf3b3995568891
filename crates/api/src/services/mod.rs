//! Services driving the multi-step flows behind the routes.

pub mod approval;
pub mod closure;
pub mod unlock;

pub use approval::{ApprovalOutcome, ApprovalService};
pub use closure::{ClosureService, ExecuteClosureError};
pub use unlock::UnlockService;

use polifund_db::repositories::{ClosureError, JournalError, LedgerError, OrganizationError};
use polifund_shared::error::AppError;
use polifund_shared::hub::HubError;

/// Maps journal repository errors to the application taxonomy.
pub(crate) fn map_journal_error(error: JournalError) -> AppError {
    match error {
        JournalError::NotFound(id) => AppError::NotFound(format!("Journal not found: {id}")),
        JournalError::Database(e) => AppError::Database(e.to_string()),
    }
}

/// Maps closure repository errors: transition guard failures become
/// conflicts, everything else is a store failure.
pub(crate) fn map_closure_error(error: ClosureError) -> AppError {
    match error {
        ClosureError::State(e) => AppError::Conflict(e.to_string()),
        ClosureError::Database(e) => AppError::Database(e.to_string()),
    }
}

/// Maps ledger repository errors to the application taxonomy.
pub(crate) fn map_ledger_error(error: LedgerError) -> AppError {
    match error {
        LedgerError::Database(e) => AppError::Database(e.to_string()),
    }
}

/// Maps organization repository errors to the application taxonomy.
pub(crate) fn map_organization_error(error: OrganizationError) -> AppError {
    match error {
        OrganizationError::NotFound(id) => {
            AppError::NotFound(format!("Organization not found: {id}"))
        }
        OrganizationError::Database(e) => AppError::Database(e.to_string()),
    }
}

/// Maps Hub client errors: the duplicate-pending rejection becomes a
/// conflict, everything else an upstream failure.
pub(crate) fn map_hub_error(error: HubError) -> AppError {
    match error {
        HubError::PendingUnlockExists => {
            AppError::Conflict("An unlock request is already pending for this year".to_string())
        }
        other => AppError::Upstream(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_pending_unlock_maps_to_conflict() {
        let mapped = map_hub_error(HubError::PendingUnlockExists);
        assert!(matches!(mapped, AppError::Conflict(_)));
        assert_eq!(mapped.status_code(), 409);
    }

    #[test]
    fn test_other_hub_errors_map_to_upstream() {
        let mapped = map_hub_error(HubError::Transport("connection refused".to_string()));
        assert!(matches!(mapped, AppError::Upstream(_)));
        assert_eq!(mapped.status_code(), 502);
    }

    #[test]
    fn test_journal_not_found_maps_to_not_found() {
        let id = Uuid::now_v7();
        let mapped = map_journal_error(JournalError::NotFound(id));
        assert!(matches!(mapped, AppError::NotFound(_)));
        assert!(mapped.to_string().contains(&id.to_string()));
    }
}

//! Fiscal-year closure service.
//!
//! Wraps the readiness check and the year state transitions. Closure
//! execution re-runs the full check server-side: a stale "ready"
//! verdict in the caller's hands never closes a year that has since
//! regressed.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;
use uuid::Uuid;

use polifund_core::closure::{
    CheckResult, ClosureStateError, YearStatus, run_check, year_window,
};
use polifund_db::repositories::{ClosureRepository, JournalRepository};
use polifund_shared::error::AppError;

use super::{map_closure_error, map_journal_error};

/// Why an execute-closure call did not close the year.
#[derive(Debug)]
pub enum ExecuteClosureError {
    /// The readiness check found blocking issues; carries the full
    /// result so the response can list them.
    Blocked(CheckResult),
    /// Any other failure.
    App(AppError),
}

impl From<AppError> for ExecuteClosureError {
    fn from(error: AppError) -> Self {
        Self::App(error)
    }
}

/// Fiscal-year closure service.
#[derive(Clone)]
pub struct ClosureService {
    journals: JournalRepository,
    closures: ClosureRepository,
}

impl ClosureService {
    /// Creates a new closure service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            journals: JournalRepository::new(db.clone()),
            closures: ClosureRepository::new(db),
        }
    }

    /// Runs the closure readiness check over every journal of the
    /// organization dated within the fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a non-four-digit year and `Database`
    /// on store failure.
    pub async fn check(
        &self,
        organization_id: Uuid,
        year: i32,
    ) -> Result<CheckResult, AppError> {
        let (start, end) = validated_window(year)?;
        let journals = self
            .journals
            .list_for_check(organization_id, start, end)
            .await
            .map_err(map_journal_error)?;
        Ok(run_check(&journals))
    }

    /// Reads the year status. A year with no closure row is open.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a non-four-digit year and `Database`
    /// on store failure.
    pub async fn status(&self, organization_id: Uuid, year: i32) -> Result<YearStatus, AppError> {
        validated_window(year)?;
        self.closures
            .get_status(organization_id, year)
            .await
            .map_err(map_closure_error)
    }

    /// Closes the year after a passing readiness check.
    ///
    /// Returns the passing check result so the response can show what
    /// was verified.
    ///
    /// # Errors
    ///
    /// Returns `Blocked` with the failing check when error-severity
    /// issues remain, and `App` for an invalid year, a year that is
    /// not open, or a store failure.
    pub async fn execute(
        &self,
        organization_id: Uuid,
        year: i32,
    ) -> Result<CheckResult, ExecuteClosureError> {
        let result = self.check(organization_id, year).await?;
        if !result.can_close {
            return Err(ExecuteClosureError::Blocked(result));
        }

        self.closures
            .execute_close(organization_id, year)
            .await
            .map_err(|e| ExecuteClosureError::App(map_closure_error(e)))?;

        info!(organization_id = %organization_id, year, "Fiscal year closed");
        Ok(result)
    }

    /// Reopens a closed year.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a non-four-digit year, `Conflict` when
    /// the year is not exactly closed, and `Database` on store failure.
    pub async fn reopen(&self, organization_id: Uuid, year: i32) -> Result<(), AppError> {
        validated_window(year)?;
        self.closures
            .reopen(organization_id, year)
            .await
            .map_err(map_closure_error)?;

        info!(organization_id = %organization_id, year, "Fiscal year reopened");
        Ok(())
    }
}

/// Validates the fiscal year, mapping the range failure to a 400.
fn validated_window(year: i32) -> Result<(chrono::NaiveDate, chrono::NaiveDate), AppError> {
    year_window(year).map_err(|e| match e {
        ClosureStateError::InvalidYear(_) => AppError::Validation(e.to_string()),
        other => AppError::Conflict(other.to_string()),
    })
}

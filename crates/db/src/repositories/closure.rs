//! Year closure repository.
//!
//! Transitions are single conditional statements so two requests
//! racing on the same (organization, year) cannot both succeed:
//! closing relies on the unique key (insert-or-nothing), reopening on
//! a status-guarded delete.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use polifund_core::closure::{ClosureStateError, YearStatus, validate_execute, validate_reopen};

use crate::entities::{ledger_year_closures, sea_orm_active_enums::ClosureStatus};

/// Error types for closure operations.
#[derive(Debug, thiserror::Error)]
pub enum ClosureError {
    /// A transition guard rejected the operation.
    #[error(transparent)]
    State(#[from] ClosureStateError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Year closure repository.
#[derive(Debug, Clone)]
pub struct ClosureRepository {
    db: Arc<DatabaseConnection>,
}

impl ClosureRepository {
    /// Creates a new closure repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Finds the closure row for (organization, year), if any.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn find(
        &self,
        organization_id: Uuid,
        year: i32,
    ) -> Result<Option<ledger_year_closures::Model>, ClosureError> {
        let row = ledger_year_closures::Entity::find()
            .filter(ledger_year_closures::Column::OrganizationId.eq(organization_id))
            .filter(ledger_year_closures::Column::FiscalYear.eq(year))
            .one(self.db.as_ref())
            .await?;
        Ok(row)
    }

    /// Reads the year status. A missing row is `Open`.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn get_status(
        &self,
        organization_id: Uuid,
        year: i32,
    ) -> Result<YearStatus, ClosureError> {
        Ok(self
            .find(organization_id, year)
            .await?
            .map_or(YearStatus::Open, |row| row.status.into()))
    }

    /// Executes closure: `open -> closed`.
    ///
    /// The insert carries `ON CONFLICT DO NOTHING` on the
    /// (organization, year) unique key; zero affected rows means a
    /// concurrent transition won, and the operation fails with the
    /// then-current status.
    ///
    /// # Errors
    ///
    /// Returns `State` when the year is not open, or a database error.
    pub async fn execute_close(
        &self,
        organization_id: Uuid,
        year: i32,
    ) -> Result<ledger_year_closures::Model, ClosureError> {
        let current = self.get_status(organization_id, year).await?;
        validate_execute(year, current)?;

        let now = Utc::now().fixed_offset();
        let row = ledger_year_closures::ActiveModel {
            id: Set(Uuid::now_v7()),
            organization_id: Set(organization_id),
            fiscal_year: Set(year),
            status: Set(ClosureStatus::Closed),
            closed_at: Set(now),
            created_at: Set(now),
        };

        let inserted = ledger_year_closures::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    ledger_year_closures::Column::OrganizationId,
                    ledger_year_closures::Column::FiscalYear,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        if inserted == 0 {
            let actual = self.get_status(organization_id, year).await?;
            return Err(ClosureStateError::StatusMismatch {
                year,
                expected: YearStatus::Open.as_str(),
                actual: actual.as_str(),
            }
            .into());
        }

        self.find(organization_id, year).await?.ok_or_else(|| {
            ClosureError::Database(DbErr::RecordNotFound(format!(
                "closure row for year {year} vanished after insert"
            )))
        })
    }

    /// Reopens a closed year: `closed -> open`.
    ///
    /// The delete is guarded by `status = 'closed'`; when zero rows are
    /// affected the year was not in exactly `closed`, and the error
    /// names the actual status (`open` when no row exists).
    ///
    /// # Errors
    ///
    /// Returns `State` with the actual status, or a database error.
    pub async fn reopen(&self, organization_id: Uuid, year: i32) -> Result<(), ClosureError> {
        let deleted = ledger_year_closures::Entity::delete_many()
            .filter(ledger_year_closures::Column::OrganizationId.eq(organization_id))
            .filter(ledger_year_closures::Column::FiscalYear.eq(year))
            .filter(ledger_year_closures::Column::Status.eq(ClosureStatus::Closed))
            .exec(self.db.as_ref())
            .await?;

        if deleted.rows_affected == 0 {
            let actual = self.get_status(organization_id, year).await?;
            validate_reopen(year, actual)?;
            // The row was closed a moment ago but someone else already
            // reopened it; report the race as a status mismatch.
            return Err(ClosureStateError::StatusMismatch {
                year,
                expected: YearStatus::Closed.as_str(),
                actual: YearStatus::Open.as_str(),
            }
            .into());
        }

        Ok(())
    }
}

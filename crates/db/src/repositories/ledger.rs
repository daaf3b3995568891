//! Ledger repository.

use std::sync::Arc;

use sea_orm::{ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::ledgers;

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: Arc<DatabaseConnection>,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Finds a ledger by its identifier.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn find_by_id(&self, ledger_id: Uuid) -> Result<Option<ledgers::Model>, LedgerError> {
        Ok(ledgers::Entity::find_by_id(ledger_id).one(self.db.as_ref()).await?)
    }

    /// Resolves the ledger owning a journal via its election or
    /// organization reference. Returns `None` when the journal has no
    /// resolvable ledger, which is not an error: approval proceeds
    /// without sync in that case.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn resolve_for_journal(
        &self,
        organization_id: Option<Uuid>,
        election_id: Option<Uuid>,
    ) -> Result<Option<ledgers::Model>, LedgerError> {
        let mut scope = Condition::any();
        if let Some(organization_id) = organization_id {
            scope = scope.add(ledgers::Column::OrganizationId.eq(organization_id));
        }
        if let Some(election_id) = election_id {
            scope = scope.add(ledgers::Column::ElectionId.eq(election_id));
        }
        if scope.is_empty() {
            return Ok(None);
        }

        Ok(ledgers::Entity::find()
            .filter(scope)
            .one(self.db.as_ref())
            .await?)
    }
}

//! Political organization and profile lookups.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use uuid::Uuid;

use crate::entities::{political_organizations, profiles};

/// Error types for organization operations.
#[derive(Debug, thiserror::Error)]
pub enum OrganizationError {
    /// Organization not found.
    #[error("Organization not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Organization repository.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: Arc<DatabaseConnection>,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Fetches an organization by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the organization does not exist, or a
    /// database error.
    pub async fn find_by_id(
        &self,
        organization_id: Uuid,
    ) -> Result<political_organizations::Model, OrganizationError> {
        political_organizations::Entity::find_by_id(organization_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(OrganizationError::NotFound(organization_id))
    }

    /// Looks up a user's email for unlock petitions. Falls back to a
    /// placeholder when no profile row exists, matching the lenient
    /// behavior the Hub expects.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn email_for_user(&self, user_id: Uuid) -> Result<String, OrganizationError> {
        Ok(profiles::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await?
            .map_or_else(|| "unknown@example.com".to_string(), |p| p.email))
    }
}

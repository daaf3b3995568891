//! Journal repository for database operations.
//!
//! Covers the reads behind the closure checker and the ledger
//! aggregate, plus the status-guarded approval write.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use polifund_core::closure::CheckJournal;
use polifund_core::journal::{Journal, JournalEntry};
use polifund_core::sync::{Contact, Redactable};

use crate::entities::{contacts, journal_entries, journals, media_assets, sea_orm_active_enums};

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Journal not found.
    #[error("Journal not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result of the status-guarded approval write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproveOutcome {
    /// The journal transitioned `draft -> approved` in this call.
    Approved,
    /// The journal was already approved; nothing was written.
    AlreadyApproved,
}

/// A journal with its entries and counterparty contact.
#[derive(Debug, Clone)]
pub struct JournalWithRelations {
    /// The journal record.
    pub journal: journals::Model,
    /// Entry lines in creation order.
    pub entries: Vec<journal_entries::Model>,
    /// Counterparty, if the journal references one.
    pub contact: Option<contacts::Model>,
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: Arc<DatabaseConnection>,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Fetches a journal with its entries and contact.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the journal does not exist, or a database
    /// error.
    pub async fn find_with_relations(
        &self,
        journal_id: Uuid,
    ) -> Result<JournalWithRelations, JournalError> {
        let journal = journals::Entity::find_by_id(journal_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(JournalError::NotFound(journal_id))?;

        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::JournalId.eq(journal_id))
            .order_by_asc(journal_entries::Column::Id)
            .all(self.db.as_ref())
            .await?;

        let contact = match journal.contact_id {
            Some(contact_id) => {
                contacts::Entity::find_by_id(contact_id)
                    .one(self.db.as_ref())
                    .await?
            }
            None => None,
        };

        Ok(JournalWithRelations {
            journal,
            entries,
            contact,
        })
    }

    /// Fetches every journal of an organization dated within
    /// `[start, end]`, with entries and receipt counts, in the shape
    /// the closure checker consumes.
    ///
    /// # Errors
    ///
    /// Returns a database error; the check is never produced from a
    /// partial read.
    pub async fn list_for_check(
        &self,
        organization_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CheckJournal>, JournalError> {
        let journal_models = journals::Entity::find()
            .filter(journals::Column::OrganizationId.eq(organization_id))
            .filter(journals::Column::JournalDate.gte(start))
            .filter(journals::Column::JournalDate.lte(end))
            .order_by_asc(journals::Column::JournalDate)
            .order_by_asc(journals::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        let ids: Vec<Uuid> = journal_models.iter().map(|j| j.id).collect();
        let mut entries_by_journal = self.entries_by_journal(&ids).await?;
        let mut receipts_by_journal = self.receipt_counts(&ids).await?;

        Ok(journal_models
            .into_iter()
            .map(|journal| {
                let entries = entries_by_journal.remove(&journal.id).unwrap_or_default();
                let receipt_count = receipts_by_journal.remove(&journal.id).unwrap_or(0);
                to_check_journal(journal, entries, receipt_count)
            })
            .collect())
    }

    /// Approves a journal with a status-guarded update.
    ///
    /// The write is a single conditional statement
    /// (`... WHERE id = ? AND status = 'draft'`), so two racing
    /// approvals cannot both fire: the loser observes zero affected
    /// rows and reports `AlreadyApproved`.
    ///
    /// # Errors
    ///
    /// Returns a database error; in that case no partial approval
    /// state is left behind.
    pub async fn approve(
        &self,
        journal_id: Uuid,
        approver_id: Uuid,
    ) -> Result<ApproveOutcome, JournalError> {
        let result = journals::Entity::update_many()
            .col_expr(
                journals::Column::Status,
                Expr::value(sea_orm_active_enums::JournalStatus::Approved),
            )
            .col_expr(journals::Column::ApprovedBy, Expr::value(Some(approver_id)))
            .col_expr(
                journals::Column::ApprovedAt,
                Expr::value(Some(Utc::now().fixed_offset())),
            )
            .filter(journals::Column::Id.eq(journal_id))
            .filter(journals::Column::Status.eq(sea_orm_active_enums::JournalStatus::Draft))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            Ok(ApproveOutcome::AlreadyApproved)
        } else {
            Ok(ApproveOutcome::Approved)
        }
    }

    /// Fetches the entry lines of every approved journal belonging to
    /// a ledger scope (organization and/or election), one vector per
    /// journal, for aggregate recomputation.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn approved_entry_sets(
        &self,
        organization_id: Option<Uuid>,
        election_id: Option<Uuid>,
    ) -> Result<Vec<Vec<JournalEntry>>, JournalError> {
        let mut scope = Condition::any();
        if let Some(organization_id) = organization_id {
            scope = scope.add(journals::Column::OrganizationId.eq(organization_id));
        }
        if let Some(election_id) = election_id {
            scope = scope.add(journals::Column::ElectionId.eq(election_id));
        }
        if scope.is_empty() {
            return Ok(Vec::new());
        }

        let journal_models = journals::Entity::find()
            .filter(journals::Column::Status.eq(sea_orm_active_enums::JournalStatus::Approved))
            .filter(scope)
            .order_by_asc(journals::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        let ids: Vec<Uuid> = journal_models.iter().map(|j| j.id).collect();
        let mut entries_by_journal = self.entries_by_journal(&ids).await?;

        Ok(journal_models
            .into_iter()
            .map(|journal| {
                entries_by_journal
                    .remove(&journal.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(to_core_entry)
                    .collect()
            })
            .collect())
    }

    /// Loads entries for a set of journals, grouped by journal id.
    async fn entries_by_journal(
        &self,
        journal_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<journal_entries::Model>>, JournalError> {
        if journal_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::JournalId.is_in(journal_ids.iter().copied()))
            .order_by_asc(journal_entries::Column::Id)
            .all(self.db.as_ref())
            .await?;

        let mut grouped: HashMap<Uuid, Vec<journal_entries::Model>> = HashMap::new();
        for entry in entries {
            grouped.entry(entry.journal_id).or_default().push(entry);
        }
        Ok(grouped)
    }

    /// Counts attached media assets per journal.
    async fn receipt_counts(
        &self,
        journal_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, usize>, JournalError> {
        if journal_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let assets = media_assets::Entity::find()
            .filter(media_assets::Column::JournalId.is_in(journal_ids.iter().copied()))
            .all(self.db.as_ref())
            .await?;

        let mut counts: HashMap<Uuid, usize> = HashMap::new();
        for asset in assets {
            *counts.entry(asset.journal_id).or_default() += 1;
        }
        Ok(counts)
    }
}

/// Maps a journal row plus its relations into the checker's input.
#[must_use]
pub fn to_check_journal(
    journal: journals::Model,
    entries: Vec<journal_entries::Model>,
    receipt_count: usize,
) -> CheckJournal {
    CheckJournal {
        id: journal.id,
        journal_date: journal.journal_date,
        description: journal.description,
        status: journal.status.into(),
        entries: entries.into_iter().map(to_core_entry).collect(),
        receipt_count,
    }
}

/// Maps a journal row into the core domain type.
#[must_use]
pub fn to_core_journal(journal: journals::Model) -> Journal {
    Journal {
        id: journal.id,
        journal_date: journal.journal_date,
        description: journal.description,
        status: journal.status.into(),
        contact_id: journal.contact_id,
        approved_by: journal.approved_by,
        approved_at: journal.approved_at.map(|t| t.with_timezone(&Utc)),
    }
}

/// Maps an entry row into the core domain type.
#[must_use]
pub fn to_core_entry(entry: journal_entries::Model) -> JournalEntry {
    JournalEntry {
        id: entry.id,
        account_code: entry.account_code,
        debit_amount: entry.debit_amount,
        credit_amount: entry.credit_amount,
    }
}

/// Maps a contact row into the core domain type, attaching the
/// privacy flags to the fields they protect.
#[must_use]
pub fn to_core_contact(contact: contacts::Model) -> Contact {
    let redactable = |value: String, private: bool, reason: &Option<String>| {
        if private {
            Redactable::private(value, reason.clone())
        } else {
            Redactable::public(value)
        }
    };

    Contact {
        id: contact.id,
        name: redactable(contact.name, contact.name_private, &contact.privacy_reason),
        address: redactable(
            contact.address,
            contact.address_private,
            &contact.privacy_reason,
        ),
        occupation: redactable(
            contact.occupation,
            contact.occupation_private,
            &contact.privacy_reason,
        ),
    }
}

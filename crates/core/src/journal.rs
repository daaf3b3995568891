//! Journal and entry domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account code prefix marking revenue accounts.
pub const REVENUE_PREFIX: &str = "REV_";

/// Account code prefix marking expense accounts.
pub const EXPENSE_PREFIX: &str = "EXP_";

/// Lifecycle status of a journal.
///
/// A journal is created in `Draft` and moves to `Approved` exactly
/// once; approval is idempotent and journals are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Recorded but not yet approved; blocks fiscal year closure.
    Draft,
    /// Approved and eligible for Hub synchronization.
    Approved,
}

impl JournalStatus {
    /// Parses a status from its stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "approved" => Some(Self::Approved),
            _ => None,
        }
    }

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
        }
    }
}

/// One business transaction in a ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    /// Unique identifier.
    pub id: Uuid,
    /// Transaction date.
    pub journal_date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Current status.
    pub status: JournalStatus,
    /// Counterparty contact, if recorded.
    pub contact_id: Option<Uuid>,
    /// Approving user, set on approval.
    pub approved_by: Option<Uuid>,
    /// Approval timestamp, set on approval.
    pub approved_at: Option<DateTime<Utc>>,
}

/// One debit/credit line belonging to a journal.
///
/// Lines need not individually balance; the journal as a whole must
/// have equal debit and credit totals to be closure-eligible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: Uuid,
    /// Account code; `REV_`/`EXP_` prefixes drive aggregates.
    pub account_code: String,
    /// Debit amount in yen (non-negative).
    pub debit_amount: i64,
    /// Credit amount in yen (non-negative).
    pub credit_amount: i64,
}

/// Sums the debit and credit amounts of a journal's entries.
#[must_use]
pub fn entry_totals(entries: &[JournalEntry]) -> (i64, i64) {
    entries.iter().fold((0, 0), |(debit, credit), e| {
        (debit + e.debit_amount, credit + e.credit_amount)
    })
}

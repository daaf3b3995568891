//! Closure readiness checker.
//!
//! Scans a fiscal year's journals for integrity violations and
//! produces a pass/fail verdict with a structured issue list. The
//! check is pure: the caller fetches the journals, this module only
//! evaluates rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::journal::{JournalEntry, JournalStatus, entry_totals};

/// Issue severity. Only `Error` issues block closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks closure.
    Error,
    /// Reported but never blocks closure.
    Warning,
}

/// The rule that produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    /// Journal is still in draft status.
    Draft,
    /// Journal has no attached receipt.
    Receipt,
    /// Journal debit and credit totals differ.
    Imbalance,
}

/// One integrity violation found by the checker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Severity of the issue.
    #[serde(rename = "type")]
    pub severity: Severity,
    /// Rule that fired.
    pub category: IssueCategory,
    /// Human-readable message.
    pub message: String,
    /// Offending journal.
    pub journal_id: Uuid,
    /// Date of the offending journal.
    pub journal_date: NaiveDate,
    /// Description of the offending journal.
    pub description: String,
}

/// Counts per rule over the checked year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSummary {
    /// Journals examined.
    pub total_journals: usize,
    /// Journals still in draft.
    pub draft_count: usize,
    /// Journals without a receipt.
    pub missing_receipt_count: usize,
    /// Journals with unequal debit/credit totals.
    pub imbalance_count: usize,
}

/// Verdict of a closure readiness check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// True iff no issue has `Error` severity.
    pub can_close: bool,
    /// Issues in journal iteration order.
    pub issues: Vec<Issue>,
    /// Per-rule counts.
    pub summary: CheckSummary,
}

/// A journal with everything the checker needs to evaluate it.
#[derive(Debug, Clone)]
pub struct CheckJournal {
    /// Journal identifier.
    pub id: Uuid,
    /// Journal date.
    pub journal_date: NaiveDate,
    /// Journal description.
    pub description: String,
    /// Journal status.
    pub status: JournalStatus,
    /// Entry lines.
    pub entries: Vec<JournalEntry>,
    /// Number of attached media assets; only `> 0` matters.
    pub receipt_count: usize,
}

/// Runs the three closure rules over a fiscal year's journals.
///
/// Each journal is evaluated independently against all three rules, so
/// one journal can contribute multiple issues. Issue ordering follows
/// the input order.
#[must_use]
pub fn run_check(journals: &[CheckJournal]) -> CheckResult {
    let mut issues = Vec::new();
    let mut summary = CheckSummary {
        total_journals: journals.len(),
        ..CheckSummary::default()
    };

    for journal in journals {
        // Rule 1: unapproved journal
        if journal.status == JournalStatus::Draft {
            summary.draft_count += 1;
            issues.push(Issue {
                severity: Severity::Error,
                category: IssueCategory::Draft,
                message: format!("Unapproved journal: {}", journal.description),
                journal_id: journal.id,
                journal_date: journal.journal_date,
                description: journal.description.clone(),
            });
        }

        // Rule 2: missing receipt
        if journal.receipt_count == 0 {
            summary.missing_receipt_count += 1;
            issues.push(Issue {
                severity: Severity::Warning,
                category: IssueCategory::Receipt,
                message: format!("Receipt not attached: {}", journal.description),
                journal_id: journal.id,
                journal_date: journal.journal_date,
                description: journal.description.clone(),
            });
        }

        // Rule 3: debit/credit mismatch
        let (total_debit, total_credit) = entry_totals(&journal.entries);
        if total_debit != total_credit {
            summary.imbalance_count += 1;
            issues.push(Issue {
                severity: Severity::Error,
                category: IssueCategory::Imbalance,
                message: format!(
                    "Debits and credits do not balance: {} (debit: {total_debit}, credit: {total_credit})",
                    journal.description
                ),
                journal_id: journal.id,
                journal_date: journal.journal_date,
                description: journal.description.clone(),
            });
        }
    }

    let has_errors = issues.iter().any(|i| i.severity == Severity::Error);

    CheckResult {
        can_close: !has_errors,
        issues,
        summary,
    }
}

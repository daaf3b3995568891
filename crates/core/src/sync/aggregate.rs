//! Ledger aggregate recomputation.
//!
//! After every approval the ledger's totals are recomputed over all
//! currently approved journals and pushed to the Hub, so the Hub's
//! aggregated view never drifts from local state.

use crate::journal::{EXPENSE_PREFIX, JournalEntry, REVENUE_PREFIX};

/// Recomputed totals for one ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerAggregate {
    /// Sum of credit amounts on `REV_*` accounts.
    pub total_income: i64,
    /// Sum of debit amounts on `EXP_*` accounts.
    pub total_expense: i64,
    /// Number of approved journals.
    pub journal_count: i64,
}

/// Computes a ledger's aggregate from the entry lines of its approved
/// journals (one slice per journal).
///
/// Income counts only credits on revenue accounts and expense only
/// debits on expense accounts; the opposite sides and all other
/// account codes are ignored.
#[must_use]
pub fn compute_aggregate(approved_journals: &[Vec<JournalEntry>]) -> LedgerAggregate {
    let mut aggregate = LedgerAggregate {
        journal_count: approved_journals.len() as i64,
        ..LedgerAggregate::default()
    };

    for entries in approved_journals {
        for entry in entries {
            if entry.account_code.starts_with(REVENUE_PREFIX) {
                aggregate.total_income += entry.credit_amount;
            } else if entry.account_code.starts_with(EXPENSE_PREFIX) {
                aggregate.total_expense += entry.debit_amount;
            }
        }
    }

    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn entry(account_code: &str, debit: i64, credit: i64) -> JournalEntry {
        JournalEntry {
            id: Uuid::now_v7(),
            account_code: account_code.to_string(),
            debit_amount: debit,
            credit_amount: credit,
        }
    }

    #[test]
    fn test_income_and_expense_split_by_prefix() {
        let journals = vec![
            vec![entry("REV_donation", 0, 1000)],
            vec![entry("EXP_travel", 400, 0)],
        ];
        let aggregate = compute_aggregate(&journals);
        assert_eq!(aggregate.total_income, 1000);
        assert_eq!(aggregate.total_expense, 400);
        assert_eq!(aggregate.journal_count, 2);
    }

    #[test]
    fn test_wrong_sides_are_ignored() {
        // A debit on a revenue account and a credit on an expense
        // account contribute nothing.
        let journals = vec![vec![
            entry("REV_donation", 500, 0),
            entry("EXP_travel", 0, 500),
        ]];
        let aggregate = compute_aggregate(&journals);
        assert_eq!(aggregate.total_income, 0);
        assert_eq!(aggregate.total_expense, 0);
        assert_eq!(aggregate.journal_count, 1);
    }

    #[test]
    fn test_unrelated_accounts_are_ignored() {
        let journals = vec![vec![entry("CASH", 1000, 1000)]];
        let aggregate = compute_aggregate(&journals);
        assert_eq!(aggregate.total_income, 0);
        assert_eq!(aggregate.total_expense, 0);
    }

    #[test]
    fn test_empty_ledger() {
        assert_eq!(compute_aggregate(&[]), LedgerAggregate::default());
    }

    #[test]
    fn test_totals_accumulate_across_journals() {
        let journals = vec![
            vec![entry("REV_donation", 0, 1000), entry("REV_party", 0, 250)],
            vec![entry("REV_donation", 0, 300)],
            vec![entry("EXP_travel", 400, 0), entry("EXP_office", 100, 0)],
        ];
        let aggregate = compute_aggregate(&journals);
        assert_eq!(aggregate.total_income, 1550);
        assert_eq!(aggregate.total_expense, 500);
        assert_eq!(aggregate.journal_count, 3);
    }
}

//! Transformation of approved journals into the Hub's representation.

use polifund_shared::hub::{SyncEntryInput, SyncJournalInput};
use uuid::Uuid;

use crate::journal::{Journal, JournalEntry};
use crate::sync::privacy::Contact;

/// Maps an approved journal, its entries, and its contact into the
/// Hub's journal payload.
///
/// Pure mapping, no I/O. Dates, descriptions, and per-entry account
/// codes and amounts are preserved exactly; the contact name passes
/// through its privacy policy so a private name is replaced by the
/// withheld marker. `ledger_source_id` joins the journal to the Hub's
/// ledger aggregate, and `is_test` segregates data from the designated
/// test identity.
#[must_use]
pub fn transform_journal(
    journal: &Journal,
    entries: &[JournalEntry],
    contact: Option<&Contact>,
    ledger_source_id: Uuid,
    is_test: bool,
) -> SyncJournalInput {
    SyncJournalInput {
        journal_source_id: journal.id,
        ledger_source_id,
        journal_date: journal.journal_date,
        description: journal.description.clone(),
        contact_name: contact.map(Contact::display_name),
        entries: entries
            .iter()
            .map(|e| SyncEntryInput {
                account_code: e.account_code.clone(),
                debit_amount: e.debit_amount,
                credit_amount: e.credit_amount,
            })
            .collect(),
        is_test,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::JournalStatus;
    use crate::sync::privacy::{Redactable, WITHHELD_MARKER};
    use chrono::NaiveDate;

    fn approved_journal() -> Journal {
        Journal {
            id: Uuid::now_v7(),
            journal_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            description: "individual donation".to_string(),
            status: JournalStatus::Approved,
            contact_id: None,
            approved_by: Some(Uuid::now_v7()),
            approved_at: Some(chrono::Utc::now()),
        }
    }

    fn entries() -> Vec<JournalEntry> {
        vec![
            JournalEntry {
                id: Uuid::now_v7(),
                account_code: "CASH".to_string(),
                debit_amount: 1000,
                credit_amount: 0,
            },
            JournalEntry {
                id: Uuid::now_v7(),
                account_code: "REV_donation".to_string(),
                debit_amount: 0,
                credit_amount: 1000,
            },
        ]
    }

    #[test]
    fn test_preserves_date_description_and_entries_exactly() {
        let journal = approved_journal();
        let ledger_id = Uuid::now_v7();
        let input = transform_journal(&journal, &entries(), None, ledger_id, false);

        assert_eq!(input.journal_source_id, journal.id);
        assert_eq!(input.ledger_source_id, ledger_id);
        assert_eq!(input.journal_date, journal.journal_date);
        assert_eq!(input.description, journal.description);
        assert_eq!(input.entries.len(), 2);
        assert_eq!(input.entries[0].account_code, "CASH");
        assert_eq!(input.entries[0].debit_amount, 1000);
        assert_eq!(input.entries[1].account_code, "REV_donation");
        assert_eq!(input.entries[1].credit_amount, 1000);
        assert!(!input.is_test);
    }

    #[test]
    fn test_public_contact_name_is_carried() {
        let contact = Contact {
            id: Uuid::now_v7(),
            name: Redactable::public("Suzuki Hanako".to_string()),
            address: Redactable::public("Tokyo".to_string()),
            occupation: Redactable::public("engineer".to_string()),
        };
        let input = transform_journal(
            &approved_journal(),
            &entries(),
            Some(&contact),
            Uuid::now_v7(),
            false,
        );
        assert_eq!(input.contact_name.as_deref(), Some("Suzuki Hanako"));
    }

    #[test]
    fn test_private_contact_name_is_withheld() {
        let contact = Contact {
            id: Uuid::now_v7(),
            name: Redactable::private("Suzuki Hanako".to_string(), None),
            address: Redactable::public("Tokyo".to_string()),
            occupation: Redactable::public("engineer".to_string()),
        };
        let input = transform_journal(
            &approved_journal(),
            &entries(),
            Some(&contact),
            Uuid::now_v7(),
            false,
        );
        assert_eq!(input.contact_name.as_deref(), Some(WITHHELD_MARKER));
        let json = serde_json::to_string(&input).unwrap();
        assert!(!json.contains("Suzuki"));
    }

    #[test]
    fn test_missing_contact_leaves_name_empty() {
        let input =
            transform_journal(&approved_journal(), &entries(), None, Uuid::now_v7(), false);
        assert_eq!(input.contact_name, None);
    }

    #[test]
    fn test_test_identity_is_flagged() {
        let input =
            transform_journal(&approved_journal(), &entries(), None, Uuid::now_v7(), true);
        assert!(input.is_test);
    }
}

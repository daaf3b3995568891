//! Hub synchronization logic.
//!
//! Pure building blocks for the approval/sync pipeline:
//! - `privacy` - per-field redaction of contact attributes
//! - `transform` - mapping approved journals into the Hub's format
//! - `aggregate` - recomputing a ledger's income/expense totals

pub mod aggregate;
pub mod privacy;
pub mod transform;

pub use aggregate::{LedgerAggregate, compute_aggregate};
pub use privacy::{Contact, Redactable, WITHHELD_MARKER};
pub use transform::transform_journal;

//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod closure;
pub mod journal;
pub mod ledger;
pub mod organization;

pub use closure::{ClosureError, ClosureRepository};
pub use journal::{ApproveOutcome, JournalError, JournalRepository, JournalWithRelations};
pub use ledger::{LedgerError, LedgerRepository};
pub use organization::{OrganizationError, OrganizationRepository};

//! Fiscal year closure logic.
//!
//! - Closure readiness checks over a year's journals
//! - The year status state machine and its transition guards

pub mod checker;
pub mod state;

pub use checker::{CheckJournal, CheckResult, CheckSummary, Issue, IssueCategory, Severity, run_check};
pub use state::{ClosureStateError, YearStatus, validate_execute, validate_reopen, year_window};

//! Year status state machine.
//!
//! One status per (ledger, fiscal year). The closure table never
//! stores `open`: a missing row reads as `Open`, and reopening deletes
//! the row. `Locked` and `TemporaryUnlock` are written by the Hub and
//! only read here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status of a fiscal year for one ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearStatus {
    /// Accepting new and modified journals. Default when no closure
    /// row exists; never written to the store.
    Open,
    /// Closed by the owner after a passing readiness check.
    Closed,
    /// Locked by the Hub (e.g., after a compliance deadline).
    Locked,
    /// Temporarily reopened by the Hub after an approved unlock request.
    TemporaryUnlock,
}

impl YearStatus {
    /// Parses a status from its stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "locked" => Some(Self::Locked),
            "temporary_unlock" => Some(Self::TemporaryUnlock),
            _ => None,
        }
    }

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Locked => "locked",
            Self::TemporaryUnlock => "temporary_unlock",
        }
    }

    /// Returns true if the year accepts journal writes.
    #[must_use]
    pub const fn accepts_writes(self) -> bool {
        matches!(self, Self::Open | Self::TemporaryUnlock)
    }
}

/// Errors raised by transition guards.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClosureStateError {
    /// The year is not in the status the transition requires.
    #[error("Year {year} must be in '{expected}' status, current status: {actual}")]
    StatusMismatch {
        /// Fiscal year.
        year: i32,
        /// Status the transition requires.
        expected: &'static str,
        /// Observed status.
        actual: &'static str,
    },

    /// The fiscal year is not a plausible four-digit year.
    #[error("Invalid fiscal year: {0}")]
    InvalidYear(i32),
}

/// Validates a fiscal year and returns its date window
/// `[year-01-01, year-12-31]`.
///
/// # Errors
///
/// Returns `InvalidYear` for years outside the four-digit range.
pub fn year_window(year: i32) -> Result<(NaiveDate, NaiveDate), ClosureStateError> {
    if !(1000..=9999).contains(&year) {
        return Err(ClosureStateError::InvalidYear(year));
    }
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(ClosureStateError::InvalidYear(year))?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(ClosureStateError::InvalidYear(year))?;
    Ok((start, end))
}

/// Guard for `open -> closed` (execute closure).
///
/// The readiness check itself is the caller's responsibility; this
/// guard only rejects executing against a year that is not open.
///
/// # Errors
///
/// Returns `StatusMismatch` naming the actual status when the year is
/// already closed, locked, or temporarily unlocked.
pub fn validate_execute(year: i32, current: YearStatus) -> Result<(), ClosureStateError> {
    if current == YearStatus::Open {
        Ok(())
    } else {
        Err(ClosureStateError::StatusMismatch {
            year,
            expected: YearStatus::Open.as_str(),
            actual: current.as_str(),
        })
    }
}

/// Guard for `closed -> open` (reopen).
///
/// Reopening is only permitted from exactly `Closed`; `Locked` and
/// `TemporaryUnlock` are Hub-owned states the owner cannot exit.
///
/// # Errors
///
/// Returns `StatusMismatch` naming the actual status otherwise.
pub fn validate_reopen(year: i32, current: YearStatus) -> Result<(), ClosureStateError> {
    if current == YearStatus::Closed {
        Ok(())
    } else {
        Err(ClosureStateError::StatusMismatch {
            year,
            expected: YearStatus::Closed.as_str(),
            actual: current.as_str(),
        })
    }
}

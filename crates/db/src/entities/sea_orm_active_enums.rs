//! Active enums mapped to PostgreSQL enum types.

use polifund_core::closure::YearStatus;
use polifund_core::journal::JournalStatus as DomainJournalStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Journal lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_status")]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Recorded but not yet approved.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Approved; eligible for Hub synchronization.
    #[sea_orm(string_value = "approved")]
    Approved,
}

impl From<JournalStatus> for DomainJournalStatus {
    fn from(status: JournalStatus) -> Self {
        match status {
            JournalStatus::Draft => Self::Draft,
            JournalStatus::Approved => Self::Approved,
        }
    }
}

/// Year closure status. `open` is never stored: a missing closure row
/// reads as open.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "closure_status")]
#[serde(rename_all = "snake_case")]
pub enum ClosureStatus {
    /// Closed by the ledger owner.
    #[sea_orm(string_value = "closed")]
    Closed,
    /// Locked by the Hub.
    #[sea_orm(string_value = "locked")]
    Locked,
    /// Temporarily reopened by the Hub.
    #[sea_orm(string_value = "temporary_unlock")]
    TemporaryUnlock,
}

impl From<ClosureStatus> for YearStatus {
    fn from(status: ClosureStatus) -> Self {
        match status {
            ClosureStatus::Closed => Self::Closed,
            ClosureStatus::Locked => Self::Locked,
            ClosureStatus::TemporaryUnlock => Self::TemporaryUnlock,
        }
    }
}

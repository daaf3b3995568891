//! `SeaORM` entity definitions.

pub mod contacts;
pub mod elections;
pub mod journal_entries;
pub mod journals;
pub mod ledger_year_closures;
pub mod ledgers;
pub mod media_assets;
pub mod political_organizations;
pub mod profiles;
pub mod sea_orm_active_enums;

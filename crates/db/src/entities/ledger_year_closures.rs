//! `SeaORM` Entity for the ledger_year_closures table.
//!
//! At most one row per (organization, fiscal year). A missing row
//! means the year is open.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ClosureStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_year_closures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub fiscal_year: i32,
    pub status: ClosureStatus,
    pub closed_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::political_organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::political_organizations::Column::Id"
    )]
    PoliticalOrganizations,
}

impl Related<super::political_organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PoliticalOrganizations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

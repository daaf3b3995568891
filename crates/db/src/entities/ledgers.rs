//! `SeaORM` Entity for the ledgers table.
//!
//! A ledger's `id` doubles as its external `ledger_source_id`, the
//! join key with the Hub.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledgers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub politician_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub election_id: Option<Uuid>,
    pub fiscal_year: Option<i32>,
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
    #[sea_orm(
        belongs_to = "super::elections::Entity",
        from = "Column::ElectionId",
        to = "super::elections::Column::Id"
    )]
    Elections,
}

impl Related<super::political_organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PoliticalOrganizations.def()
    }
}

impl Related<super::elections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Elections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

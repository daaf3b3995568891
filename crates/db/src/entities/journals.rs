//! `SeaORM` Entity for the journals table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::JournalStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub election_id: Option<Uuid>,
    pub journal_date: Date,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub status: JournalStatus,
    pub contact_id: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_entries::Entity")]
    JournalEntries,
    #[sea_orm(has_many = "super::media_assets::Entity")]
    MediaAssets,
    #[sea_orm(
        belongs_to = "super::contacts::Entity",
        from = "Column::ContactId",
        to = "super::contacts::Column::Id"
    )]
    Contacts,
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

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl Related<super::media_assets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MediaAssets.def()
    }
}

impl Related<super::contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contacts.def()
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, QueryTrait};

    #[test]
    fn test_journal_joins_reach_both_ledger_owners() {
        let sql = Entity::find()
            .find_also_related(crate::entities::political_organizations::Entity)
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains("political_organizations"));

        let sql = Entity::find()
            .find_also_related(crate::entities::elections::Entity)
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains("elections"));
    }
}

//! Categories Entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:         Uuid,
    pub name:       String,
    pub created_by: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Creator,
    #[sea_orm(has_many = "super::incidents::Entity")]
    Incidents,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::Creator.def() }
}

impl Related<super::incidents::Entity> for Entity {
    fn to() -> RelationDef { Relation::Incidents.def() }
}

impl ActiveModelBehavior for ActiveModel {}

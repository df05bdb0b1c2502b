//! Students Entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:         Uuid,
    pub name:       String,
    pub group_id:   Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Group,
    #[sea_orm(has_many = "super::incidents::Entity")]
    Incidents,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef { Relation::Group.def() }
}

impl Related<super::incidents::Entity> for Entity {
    fn to() -> RelationDef { Relation::Incidents.def() }
}

impl ActiveModelBehavior for ActiveModel {}

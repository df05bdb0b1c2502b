//! Users Entity
//!
//! One row per account. The primary key is the identity carried in session
//! tokens; `school_role` is free-text job title, unrelated to authorization.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:            Uuid,
    pub role_id:       Uuid,
    pub display_name:  String,
    pub school_role:   Option<String>,
    #[sea_orm(unique)]
    pub email:         String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at:    DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::roles::Entity",
        from = "Column::RoleId",
        to = "super::roles::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Role,
    #[sea_orm(has_many = "super::incidents::Entity")]
    Incidents,
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef { Relation::Role.def() }
}

impl Related<super::incidents::Entity> for Entity {
    fn to() -> RelationDef { Relation::Incidents.def() }
}

impl ActiveModelBehavior for ActiveModel {}

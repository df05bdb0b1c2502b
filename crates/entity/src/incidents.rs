//! Incidents Entity
//!
//! A recorded behavior event. `date` is the calendar day the event happened;
//! `created_at` is when it was recorded and drives list order.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sea_orm_active_enums::Severity;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "incidents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:          Uuid,
    pub student_id:  Uuid,
    pub category_id: Uuid,
    pub severity:    Severity,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub date:        Date,
    pub teacher_id:  Uuid,
    pub created_at:  DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Teacher,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef { Relation::Student.def() }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::Teacher.def() }
}

impl ActiveModelBehavior for ActiveModel {}

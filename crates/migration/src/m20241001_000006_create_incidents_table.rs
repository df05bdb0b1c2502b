use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20241001_000002_create_users_table::Users,
    m20241001_000004_create_categories_table::Categories,
    m20241001_000005_create_students_table::Students,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Severity is a short string with a CHECK so the same DDL works on
        // PostgreSQL and SQLite.
        manager
            .create_table(
                Table::create()
                    .table(Incidents::Table)
                    .if_not_exists()
                    .col(pk_uuid(Incidents::Id))
                    .col(uuid(Incidents::StudentId))
                    .col(uuid(Incidents::CategoryId))
                    .col(
                        string_len(Incidents::Severity, 16)
                            .check(Expr::col(Incidents::Severity).is_in(["low", "medium", "high"])),
                    )
                    .col(text(Incidents::Description))
                    .col(date(Incidents::Date))
                    .col(uuid(Incidents::TeacherId))
                    .col(timestamp_with_time_zone(Incidents::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incidents_student_id")
                            .from(Incidents::Table, Incidents::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incidents_category_id")
                            .from(Incidents::Table, Incidents::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incidents_teacher_id")
                            .from(Incidents::Table, Incidents::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_incidents_student_id", Incidents::StudentId),
            ("idx_incidents_category_id", Incidents::CategoryId),
            ("idx_incidents_teacher_id", Incidents::TeacherId),
            ("idx_incidents_created_at", Incidents::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Incidents::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Incidents::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Incidents {
    Table,
    Id,
    StudentId,
    CategoryId,
    Severity,
    Description,
    Date,
    TeacherId,
    CreatedAt,
}

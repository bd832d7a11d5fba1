use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Activities::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Activities::Description).text().not_null())
                    .col(ColumnDef::new(Activities::Type).string().not_null())
                    .col(ColumnDef::new(Activities::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Activities::SubjectType).string().not_null())
                    .col(ColumnDef::new(Activities::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Activities::ActivityDate).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Activities::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Activities::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activities_user_id")
                            .from(Activities::Table, Activities::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activities_subject")
                    .table(Activities::Table)
                    .col(Activities::SubjectType)
                    .col(Activities::SubjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activities_user_id")
                    .table(Activities::Table)
                    .col(Activities::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activities_activity_date")
                    .table(Activities::Table)
                    .col(Activities::ActivityDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
    Description,
    Type,
    UserId,
    SubjectType,
    SubjectId,
    ActivityDate,
    CreatedAt,
    UpdatedAt,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Companies::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Companies::Name).string().not_null())
                    .col(ColumnDef::new(Companies::Industry).string())
                    .col(ColumnDef::new(Companies::Website).string())
                    .col(ColumnDef::new(Companies::PhoneNumber).string())
                    .col(ColumnDef::new(Companies::Address).text())
                    .col(ColumnDef::new(Companies::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Companies::Notes).text())
                    .col(ColumnDef::new(Companies::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Companies::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_companies_owner_id")
                            .from(Companies::Table, Companies::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Contacts::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Contacts::FirstName).string().not_null())
                    .col(ColumnDef::new(Contacts::LastName).string().not_null())
                    .col(ColumnDef::new(Contacts::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Contacts::PhoneNumber).string())
                    .col(ColumnDef::new(Contacts::CompanyId).big_integer())
                    .col(ColumnDef::new(Contacts::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Contacts::Notes).text())
                    .col(ColumnDef::new(Contacts::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Contacts::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contacts_company_id")
                            .from(Contacts::Table, Contacts::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contacts_owner_id")
                            .from(Contacts::Table, Contacts::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leads::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Leads::FirstName).string().not_null())
                    .col(ColumnDef::new(Leads::LastName).string().not_null())
                    .col(ColumnDef::new(Leads::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Leads::PhoneNumber).string())
                    .col(ColumnDef::new(Leads::Source).string().not_null())
                    .col(ColumnDef::new(Leads::Status).string().not_null())
                    .col(ColumnDef::new(Leads::AssignedToId).big_integer())
                    .col(ColumnDef::new(Leads::ConvertedToContactId).big_integer())
                    .col(ColumnDef::new(Leads::ConvertedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Leads::Notes).text())
                    .col(ColumnDef::new(Leads::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Leads::UpdatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Leads::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leads_assigned_to_id")
                            .from(Leads::Table, Leads::AssignedToId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    // A converted lead must keep pointing at its contact
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leads_converted_to_contact_id")
                            .from(Leads::Table, Leads::ConvertedToContactId)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leads_assigned_to_id")
                    .table(Leads::Table)
                    .col(Leads::AssignedToId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DealStages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DealStages::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(DealStages::Name).string().not_null())
                    .col(ColumnDef::new(DealStages::Order).integer().not_null().default(0))
                    .col(ColumnDef::new(DealStages::Color).string().not_null().default("#3B82F6"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Deals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Deals::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Deals::Name).string().not_null())
                    .col(ColumnDef::new(Deals::ContactId).big_integer().not_null())
                    .col(ColumnDef::new(Deals::DealStageId).big_integer().not_null())
                    .col(ColumnDef::new(Deals::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Deals::ClosingDate).date())
                    .col(ColumnDef::new(Deals::Probability).integer().not_null().default(50))
                    .col(ColumnDef::new(Deals::AssignedToId).big_integer().not_null())
                    .col(ColumnDef::new(Deals::Description).text())
                    .col(ColumnDef::new(Deals::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Deals::UpdatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Deals::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deals_contact_id")
                            .from(Deals::Table, Deals::ContactId)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deals_deal_stage_id")
                            .from(Deals::Table, Deals::DealStageId)
                            .to(DealStages::Table, DealStages::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deals_assigned_to_id")
                            .from(Deals::Table, Deals::AssignedToId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deals_assigned_to_id")
                    .table(Deals::Table)
                    .col(Deals::AssignedToId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tasks::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Tasks::Title).string().not_null())
                    .col(ColumnDef::new(Tasks::Description).text())
                    .col(ColumnDef::new(Tasks::DueDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Tasks::Status).string().not_null().default("Pending"))
                    .col(ColumnDef::new(Tasks::Priority).string().not_null().default("Medium"))
                    .col(ColumnDef::new(Tasks::AssignedToId).big_integer().not_null())
                    .col(ColumnDef::new(Tasks::RelatedToType).string().not_null())
                    .col(ColumnDef::new(Tasks::RelatedToId).big_integer().not_null())
                    .col(ColumnDef::new(Tasks::CompletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Tasks::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Tasks::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_assigned_to_id")
                            .from(Tasks::Table, Tasks::AssignedToId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_related_to")
                    .table(Tasks::Table)
                    .col(Tasks::RelatedToType)
                    .col(Tasks::RelatedToId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Tasks::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Deals::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(DealStages::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Leads::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Contacts::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Companies::Table).to_owned()).await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    Name,
    Industry,
    Website,
    PhoneNumber,
    Address,
    OwnerId,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Contacts {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    CompanyId,
    OwnerId,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Leads {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    Source,
    Status,
    AssignedToId,
    ConvertedToContactId,
    ConvertedAt,
    Notes,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum DealStages {
    Table,
    Id,
    Name,
    Order,
    Color,
}

#[derive(DeriveIden)]
enum Deals {
    Table,
    Id,
    Name,
    ContactId,
    DealStageId,
    AmountCents,
    ClosingDate,
    Probability,
    AssignedToId,
    Description,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    Title,
    Description,
    DueDate,
    Status,
    Priority,
    AssignedToId,
    RelatedToType,
    RelatedToId,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

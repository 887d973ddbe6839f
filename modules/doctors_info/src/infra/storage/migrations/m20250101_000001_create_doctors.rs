use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Doctors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Doctors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Doctors::FirstName).string().not_null())
                    .col(ColumnDef::new(Doctors::LastName).string().not_null())
                    .col(ColumnDef::new(Doctors::Specialty).string().not_null())
                    .col(ColumnDef::new(Doctors::ContactNumber).string().not_null())
                    .col(
                        ColumnDef::new(Doctors::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Doctors::OfficeAddress).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Doctors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Doctors {
    Table,
    Id,
    FirstName,
    LastName,
    Specialty,
    ContactNumber,
    Email,
    OfficeAddress,
}

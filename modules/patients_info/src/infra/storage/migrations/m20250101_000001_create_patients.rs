use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Patients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Patients::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Patients::FirstName).string().not_null())
                    .col(ColumnDef::new(Patients::LastName).string().not_null())
                    // nullable column; creation still requires a value
                    .col(ColumnDef::new(Patients::DateOfBirth).date().null())
                    .col(ColumnDef::new(Patients::Gender).string().not_null())
                    .col(ColumnDef::new(Patients::ContactNumber).string().not_null())
                    .col(
                        ColumnDef::new(Patients::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Patients::Address).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Patients::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Patients {
    Table,
    Id,
    FirstName,
    LastName,
    DateOfBirth,
    Gender,
    ContactNumber,
    Email,
    Address,
}

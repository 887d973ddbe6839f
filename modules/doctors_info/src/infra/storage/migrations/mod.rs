use sea_orm_migration::prelude::*;

mod m20250101_000001_create_doctors;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_create_doctors::Migration)]
    }

    // Each module keeps its own history so migrators sharing a database
    // never see each other's entries.
    fn migration_table_name() -> DynIden {
        Alias::new("doctors_info_migrations").into_iden()
    }
}

pub use sea_orm_migration::prelude::*;

mod m20260101_000000_create_backoffice_schema;
mod m20260101_000100_add_sorting_indexes;
mod m20260101_000200_create_billing_mirror;
mod m20260101_000300_add_initial_admin;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000000_create_backoffice_schema::Migration),
            Box::new(m20260101_000100_add_sorting_indexes::Migration),
            Box::new(m20260101_000200_create_billing_mirror::Migration),
            Box::new(m20260101_000300_add_initial_admin::Migration),
        ]
    }
}

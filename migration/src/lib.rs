pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20250301_000001_initial_schema;
mod m20250315_000001_kampanija;
mod m20250402_000001_unique_constraints;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_initial_schema::Migration),
            Box::new(m20250315_000001_kampanija::Migration),
            Box::new(m20250402_000001_unique_constraints::Migration),
        ]
    }
}

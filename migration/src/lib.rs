pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_access_points;
mod m20250301_000003_create_visitors;
mod m20250301_000004_create_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_access_points::Migration),
            Box::new(m20250301_000003_create_visitors::Migration),
            Box::new(m20250301_000004_create_notifications::Migration),
        ]
    }
}

use crate::config::{Settings, connect_database, migrate_database};

/// Run database migrations
///
/// Connects to the configured database and applies all pending migrations.
/// Does not initialize the full AppData structure.
pub async fn run_migrations(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = connect_database(settings.database_url()).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");
    Ok(())
}

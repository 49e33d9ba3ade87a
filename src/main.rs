use std::sync::Arc;

use clap::Parser;
use poem::{Server, listener::TcpListener};

use visitdesk::api::build_routes;
use visitdesk::app_data::AppData;
use visitdesk::cli::{Cli, Commands, create_admin, migrate};
use visitdesk::config::{Settings, connect_database, init_logging, migrate_database};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    tracing::debug!("Loaded settings: {:?}", settings);

    match cli.command() {
        Commands::Migrate => migrate::run_migrations(&settings).await,
        Commands::CreateAdmin { username, full_name } => {
            let app_data = init_app_data(settings).await?;
            create_admin::create_admin(app_data, &username, &full_name).await
        }
        Commands::Serve => serve(settings).await,
    }
}

/// Connect, migrate and build the shared application data
async fn init_app_data(settings: Settings) -> Result<Arc<AppData>, Box<dyn std::error::Error>> {
    let db = connect_database(settings.database_url()).await?;
    migrate_database(&db).await?;

    Ok(Arc::new(AppData::init(db, settings)))
}

async fn serve(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let address = settings.server_address();
    let public_url = settings.public_url().to_string();

    let app_data = init_app_data(settings).await?;
    let app = build_routes(app_data);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at {}/swagger", public_url);

    Server::new(TcpListener::bind(address)).run(app).await?;

    Ok(())
}

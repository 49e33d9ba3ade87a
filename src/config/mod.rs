pub mod config_spec;
pub mod database;
pub mod env_provider;
pub mod errors;
pub mod logging;
pub mod settings;

pub use config_spec::ConfigSpec;
pub use database::{connect_database, migrate_database};
pub use env_provider::{EnvironmentProvider, MockEnvironment, SystemEnvironment};
pub use errors::ConfigError;
pub use logging::init_logging;
pub use settings::Settings;

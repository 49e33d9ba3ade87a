use thiserror::Error;

/// Errors raised while loading settings from the environment
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid setting '{setting_name}': {reason}")]
    InvalidSetting { setting_name: String, reason: String },

    #[error("Failed to parse setting '{setting_name}': {error}")]
    ParseError { setting_name: String, error: String },

    #[error("Required setting '{setting_name}' is missing")]
    MissingSetting { setting_name: String },
}

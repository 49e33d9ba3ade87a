use std::fmt;
use std::sync::Arc;

use crate::config::EnvironmentProvider;
use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ConfigError;

/// Process settings loaded once at startup
///
/// Infrastructure values (database, listener) and the secrets used by the
/// token, password and check-in services.
pub struct Settings {
    database_url: String,
    server_host: String,
    server_port: u16,
    public_url: String,
    jwt_secret: String,
    refresh_token_secret: String,
    password_pepper: String,
    checkin_secret: String,
    jwt_expiration_minutes: i64,
    refresh_expiration_days: i64,
}

impl Settings {
    /// Load settings through the given environment provider
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ConfigError> {
        let database_url = ConfigSpec::new(env_provider.clone())
            .env_override("DATABASE_URL")
            .default_value("sqlite://visitdesk.db?mode=rwc")
            .min_length(1)
            .load_setting_with_source()?
            .value;

        let server_host = ConfigSpec::new(env_provider.clone())
            .env_override("HOST")
            .default_value("0.0.0.0")
            .validator(ConfigSpec::validate_host_address)
            .load_setting_with_source()?
            .value;

        let port_value = ConfigSpec::new(env_provider.clone())
            .env_override("PORT")
            .default_value("3000")
            .validator(|value| ConfigSpec::validate_port_range(value, 1, 65535))
            .load_setting_with_source()?
            .value;
        let server_port = ConfigSpec::parse_port(&port_value, "PORT")?;

        let public_url = ConfigSpec::new(env_provider.clone())
            .env_override("PUBLIC_URL")
            .default_value("http://localhost:3000")
            .min_length(1)
            .load_setting_with_source()?
            .value;

        let jwt_secret = Self::load_secret(&env_provider, "JWT_SECRET", 32)?;
        let refresh_token_secret = Self::load_secret(&env_provider, "REFRESH_TOKEN_SECRET", 32)?;
        let password_pepper = Self::load_secret(&env_provider, "PASSWORD_PEPPER", 16)?;
        let checkin_secret = Self::load_secret(&env_provider, "CHECKIN_SECRET", 32)?;

        let jwt_minutes_value = ConfigSpec::new(env_provider.clone())
            .env_override("JWT_EXPIRATION_MINUTES")
            .default_value("15")
            .validator(|value| ConfigSpec::validate_integer_range(value, 1, 1440))
            .load_setting_with_source()?
            .value;
        let jwt_expiration_minutes = ConfigSpec::parse_integer(&jwt_minutes_value, "JWT_EXPIRATION_MINUTES")?;

        let refresh_days_value = ConfigSpec::new(env_provider.clone())
            .env_override("REFRESH_EXPIRATION_DAYS")
            .default_value("7")
            .validator(|value| ConfigSpec::validate_integer_range(value, 1, 90))
            .load_setting_with_source()?
            .value;
        let refresh_expiration_days = ConfigSpec::parse_integer(&refresh_days_value, "REFRESH_EXPIRATION_DAYS")?;

        Ok(Self {
            database_url,
            server_host,
            server_port,
            public_url: public_url.trim_end_matches('/').to_string(),
            jwt_secret,
            refresh_token_secret,
            password_pepper,
            checkin_secret,
            jwt_expiration_minutes,
            refresh_expiration_days,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ConfigError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    fn load_secret(
        env_provider: &Arc<dyn EnvironmentProvider + Send + Sync>,
        name: &str,
        min_length: usize,
    ) -> Result<String, ConfigError> {
        Ok(ConfigSpec::new(env_provider.clone())
            .env_override(name)
            .required(true)
            .min_length(min_length)
            .load_setting_with_source()?
            .value)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn refresh_token_secret(&self) -> &str {
        &self.refresh_token_secret
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub fn checkin_secret(&self) -> &str {
        &self.checkin_secret
    }

    pub fn jwt_expiration_minutes(&self) -> i64 {
        self.jwt_expiration_minutes
    }

    pub fn refresh_expiration_days(&self) -> i64 {
        self.refresh_expiration_days
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("public_url", &self.public_url)
            .field("jwt_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .field("checkin_secret", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("refresh_expiration_days", &self.refresh_expiration_days)
            .finish()
    }
}

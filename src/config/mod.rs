pub use crate::config::auth::AuthConfig;
pub use crate::config::database::DatabaseConfig;

use serde::Deserialize;

pub mod auth;
pub mod database;

/// Main configuration structure for the coffee shop server
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port the API server will listen to (default: 5000)
    #[serde(default)]
    pub port: u16,

    /// Identity provider configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Drinks database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            auth: AuthConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl AppConfig {
    /// Creates a new configuration from defaults overridden by environment
    /// variables (prefix `COFFEESHOP_`)
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("COFFEESHOP_PORT") {
            config.port = port
                .parse::<u16>()
                .map_err(|e| format!("invalid COFFEESHOP_PORT: {}", e))?;
        }

        config.auth = AuthConfig::from_env(&config.auth)?;
        config.database = DatabaseConfig::from_env(&config.database);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        for (name, _value) in std::env::vars() {
            if name.starts_with("COFFEESHOP_") {
                std::env::remove_var(name);
            }
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.database.url, "coffeeshop.db");
        assert_eq!(config.auth.audience, "coffee");
        assert_eq!(config.auth.keys_ttl, 3600);

        std::env::set_var("COFFEESHOP_PORT", "8080");
        std::env::set_var("COFFEESHOP_DATABASE_URL", "/tmp/drinks.db");
        std::env::set_var("COFFEESHOP_AUTH_ISSUER", "https://tenant.auth0.com/");
        std::env::set_var("COFFEESHOP_AUTH_AUDIENCE", "espresso");
        std::env::set_var("COFFEESHOP_AUTH_KEYS_TTL", "60");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database.url, "/tmp/drinks.db");
        assert_eq!(config.auth.issuer, "https://tenant.auth0.com/");
        assert_eq!(config.auth.audience, "espresso");
        assert_eq!(config.auth.keys_ttl, 60);
        assert_eq!(
            config.auth.jwks_endpoint().unwrap().as_str(),
            "https://tenant.auth0.com/.well-known/jwks.json"
        );

        std::env::set_var("COFFEESHOP_PORT", "not-a-port");
        assert!(AppConfig::from_env().is_err());

        for name in [
            "COFFEESHOP_PORT",
            "COFFEESHOP_DATABASE_URL",
            "COFFEESHOP_AUTH_ISSUER",
            "COFFEESHOP_AUTH_AUDIENCE",
            "COFFEESHOP_AUTH_KEYS_TTL",
        ] {
            std::env::remove_var(name);
        }
    }
}

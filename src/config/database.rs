use serde::Deserialize;

/// Configuration for the drinks database
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite database path (default: coffeeshop.db)
    #[serde(default)]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "coffeeshop.db".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Creates a new configuration from environment variables
    pub fn from_env(config: &Self) -> Self {
        let mut result = config.clone();

        if let Ok(url) = std::env::var("COFFEESHOP_DATABASE_URL") {
            result.url = url;
        }

        result
    }
}

use std::sync::Arc;

use crate::auth::verifier::TokenVerifier;
use crate::config::AppConfig;
use crate::db::DrinkStore;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<DrinkStore>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, String> {
        let store = DrinkStore::new(&config.database.url)
            .map_err(|e| format!("Failed to open database: {}", e))?;
        let verifier = TokenVerifier::new(&config.auth)
            .map_err(|e| format!("Invalid identity provider configuration: {}", e))?;

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
            verifier: Arc::new(verifier),
        })
    }
}

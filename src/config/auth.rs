use serde::Deserialize;
use url::Url;

/// Configuration for the external identity provider
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Token issuer, e.g. `https://your-tenant.auth0.com/`
    #[serde(default)]
    pub issuer: String,

    /// API audience expected in verified tokens (default: coffee)
    #[serde(default)]
    pub audience: String,

    /// JSON Web Key Set endpoint; derived from the issuer when empty
    #[serde(default)]
    pub jwks_url: String,

    /// How long fetched signing keys are kept, in seconds (default: 3600)
    #[serde(default)]
    pub keys_ttl: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "".to_string(),
            audience: "coffee".to_string(),
            jwks_url: "".to_string(),
            keys_ttl: 3600,
        }
    }
}

impl AuthConfig {
    /// Creates a new configuration from environment variables
    pub fn from_env(config: &Self) -> Result<Self, String> {
        // Start with the provided configuration
        let mut result = config.clone();

        if let Ok(issuer) = std::env::var("COFFEESHOP_AUTH_ISSUER") {
            result.issuer = issuer;
        }

        if let Ok(audience) = std::env::var("COFFEESHOP_AUTH_AUDIENCE") {
            result.audience = audience;
        }

        if let Ok(url) = std::env::var("COFFEESHOP_AUTH_JWKS_URL") {
            result.jwks_url = url;
        }

        if let Ok(ttl) = std::env::var("COFFEESHOP_AUTH_KEYS_TTL") {
            result.keys_ttl = ttl
                .parse::<u64>()
                .map_err(|e| format!("invalid COFFEESHOP_AUTH_KEYS_TTL: {}", e))?;
        }

        Ok(result)
    }

    /// The effective key set endpoint: the explicit override when set,
    /// otherwise the issuer's well-known location.
    pub fn jwks_endpoint(&self) -> Result<Url, url::ParseError> {
        if !self.jwks_url.is_empty() {
            return Url::parse(&self.jwks_url);
        }
        Url::parse(&self.issuer)?.join(".well-known/jwks.json")
    }
}

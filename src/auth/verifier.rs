//! Token verification against the identity provider's published key set.
//!
//! The provider signs access tokens with RS256; the matching public keys are
//! published as a JWKS document. Keys are cached by key id and re-fetched
//! lazily when a token references an unknown key or the cache entry expired.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use log::debug;
use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::auth::AuthError;
use crate::config::AuthConfig;

/// Claims carried by a verified access token.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Subject the token was issued for
    #[serde(default)]
    pub sub: String,
    /// Permission strings granted to the caller; absent when the provider
    /// did not attach the claim at all
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// Verifies bearer tokens against the identity provider's key set.
pub struct TokenVerifier {
    client: Client,
    jwks_url: Url,
    issuer: String,
    audience: String,
    keys: Cache<String, Jwk>,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self, url::ParseError> {
        let jwks_url = config.jwks_endpoint()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(2))
            .build()
            .expect("Failed to create JWKS client");
        let keys = Cache::builder()
            .time_to_live(Duration::from_secs(config.keys_ttl))
            .build();

        Ok(Self {
            client,
            jwks_url,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            keys,
        })
    }

    /// Verifies signature, expiry, audience and issuer, and returns the
    /// token's claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header =
            decode_header(token).map_err(|e| AuthError::MalformedToken(e.to_string()))?;
        let kid = header.kid.ok_or(AuthError::UnknownKey)?;

        let jwk = match self.keys.get(&kid).await {
            Some(jwk) => jwk,
            None => {
                self.refresh_keys().await?;
                self.keys.get(&kid).await.ok_or(AuthError::UnknownKey)?
            }
        };
        let key =
            DecodingKey::from_jwk(&jwk).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &key, &validation).map_err(|err| match err.kind() {
            ErrorKind::Json(_) | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
                AuthError::MalformedToken(err.to_string())
            }
            _ => AuthError::InvalidToken(err.to_string()),
        })?;

        debug!("verified token for subject '{}'", data.claims.sub);
        Ok(data.claims)
    }

    /// Fetches the remote key set and repopulates the cache.
    async fn refresh_keys(&self) -> Result<(), AuthError> {
        debug!("fetching signing keys from {}", self.jwks_url);
        let jwks: JwkSet = self
            .client
            .get(self.jwks_url.clone())
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        for jwk in jwks.keys {
            if let Some(kid) = jwk.common.key_id.clone() {
                self.keys.insert(kid, jwk).await;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::AuthError;
    use crate::test_utils::TestFixture;

    #[tokio::test]
    async fn test_verify_valid_token() {
        let fixture = TestFixture::new().await;
        let token = fixture.token(&["get:drinks-detail"]);

        let claims = fixture.state.verifier.verify(&token).await.unwrap();
        assert_eq!(
            claims.permissions.unwrap(),
            vec!["get:drinks-detail".to_string()]
        );
    }

    #[tokio::test]
    async fn test_verify_garbage_token() {
        let fixture = TestFixture::new().await;
        let err = fixture
            .state
            .verifier
            .verify("not-a-token")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));
    }

    #[tokio::test]
    async fn test_verify_unknown_key() {
        let fixture = TestFixture::new().await;
        let token = fixture.token_with_kid(&["get:drinks-detail"], "some-other-key");

        let err = fixture.state.verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownKey));
    }

    #[tokio::test]
    async fn test_verify_expired_token() {
        let fixture = TestFixture::new().await;
        let token = fixture.expired_token(&["get:drinks-detail"]);

        let err = fixture.state.verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_verify_wrong_audience() {
        let fixture = TestFixture::new().await;
        let token = fixture.token_for_audience(&["get:drinks-detail"], "another-api");

        let err = fixture.state.verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_verify_key_fetch_failure() {
        let fixture = TestFixture::new().await;
        fixture.fail_jwks().await;

        let token = fixture.token(&["get:drinks-detail"]);
        let err = fixture.state.verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::KeyFetch(_)));
    }

    #[tokio::test]
    async fn test_verify_keeps_missing_permissions_claim() {
        let fixture = TestFixture::new().await;
        let token = fixture.token_without_permissions();

        let claims = fixture.state.verifier.verify(&token).await.unwrap();
        assert!(claims.permissions.is_none());
    }
}

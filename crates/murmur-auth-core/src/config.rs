//! Configuration types for the auth core

use std::time::Duration;

use crate::policy::AllowList;
use crate::secret::SigningSecret;
use crate::AuthError;

/// Google's published JWKS endpoint
pub const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Issuer strings Google puts in ID tokens
pub const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Auth core configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// OAuth client ID the identity assertions must be minted for
    pub client_id: String,
    /// Secret for signing first-party session tokens
    pub session_secret: SigningSecret,
    /// Identities permitted to use the service
    pub allow_list: AllowList,
    /// How long an issued session token stays valid
    pub token_validity: Duration,
    /// Upper bound on how long the provider key set is cached
    pub jwks_cache_duration: Duration,
    /// Where the provider key set is fetched from
    pub jwks_url: String,
    /// Issuers accepted on identity assertions
    pub accepted_issuers: Vec<String>,
}

impl AuthConfig {
    /// Create a new auth config
    ///
    /// # Errors
    /// Returns [`AuthError::Configuration`] when the secret is too short or the
    /// client ID is empty.
    pub fn try_new(
        client_id: impl Into<String>,
        session_secret: impl AsRef<[u8]>,
        allow_list: AllowList,
    ) -> Result<Self, AuthError> {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(AuthError::Configuration("client ID must not be empty".into()));
        }

        let session_secret = SigningSecret::new(session_secret)
            .map_err(|e| AuthError::Configuration(e.to_string()))?;

        Ok(Self {
            client_id,
            session_secret,
            allow_list,
            token_validity: Duration::from_secs(2 * 60 * 60), // 2 hours
            jwks_cache_duration: Duration::from_secs(60 * 60), // 1 hour
            jwks_url: GOOGLE_JWKS_URL.to_string(),
            accepted_issuers: GOOGLE_ISSUERS.iter().map(|s| (*s).to_string()).collect(),
        })
    }

    /// Set token validity window
    pub fn with_token_validity(mut self, validity: Duration) -> Self {
        self.token_validity = validity;
        self
    }

    /// Set JWKS cache duration
    pub fn with_jwks_cache_duration(mut self, duration: Duration) -> Self {
        self.jwks_cache_duration = duration;
        self
    }

    /// Override the JWKS URL (used by tests against a mock provider)
    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = url.into();
        self
    }
}

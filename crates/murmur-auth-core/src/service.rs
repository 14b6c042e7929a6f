//! Auth service - ties together assertion verification and session tokens

use std::sync::Arc;

use crate::{
    assertion::IdentityAssertionVerifier,
    config::AuthConfig,
    keys::{JwksKeyFetcher, KeyFetcher},
    session::{extract_bearer, IssuedToken, SessionTokenService},
    AuthError,
};

/// Authentication service
///
/// Provides a unified interface for:
/// - Login (identity assertion → session token)
/// - Per-request authorization (bearer header → email)
#[derive(Debug, Clone)]
pub struct AuthService {
    client_id: String,
    verifier: IdentityAssertionVerifier,
    sessions: SessionTokenService,
}

impl AuthService {
    /// Create an auth service that fetches provider keys from `config.jwks_url`
    pub fn new(config: AuthConfig) -> Self {
        let keys = Arc::new(JwksKeyFetcher::new(&config));
        Self::with_key_fetcher(config, keys)
    }

    /// Create an auth service with a custom key source
    pub fn with_key_fetcher(config: AuthConfig, keys: Arc<dyn KeyFetcher>) -> Self {
        Self {
            verifier: IdentityAssertionVerifier::new(keys, config.accepted_issuers),
            sessions: SessionTokenService::new(
                config.session_secret,
                config.allow_list,
                config.token_validity,
            ),
            client_id: config.client_id,
        }
    }

    /// Exchange a provider identity assertion for a session token
    pub async fn login(&self, assertion: &str) -> Result<IssuedToken, AuthError> {
        let identity = self.verifier.verify(assertion, &self.client_id).await?;
        let issued = self.sessions.issue(&identity.email)?;
        tracing::info!(email = %identity.email, expires_at = %issued.expires_at, "Session token issued");
        Ok(issued)
    }

    /// Authorize a request from its `Authorization` header value
    pub fn authorize(&self, authorization: Option<&str>) -> Result<String, AuthError> {
        let token = extract_bearer(authorization)?;
        self.sessions.validate(token)
    }

    pub fn sessions(&self) -> &SessionTokenService {
        &self.sessions
    }
}

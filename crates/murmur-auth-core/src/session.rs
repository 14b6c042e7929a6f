//! First-party session tokens (HS256 JWT)
//!
//! Tokens are stateless: validity is recomputed from the signature, the
//! embedded expiry and the allow-list on every request. Removing an email from
//! the allow-list revokes every token already issued for it.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::policy::AllowList;
use crate::secret::SigningSecret;
use crate::AuthError;

/// Claims embedded in a session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Authorized email
    pub email: String,
    /// Issued at (seconds)
    pub iat: i64,
    /// Expiration (seconds)
    pub exp: i64,
}

/// A freshly minted session token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Mints and validates session tokens for allow-listed identities
#[derive(Debug, Clone)]
pub struct SessionTokenService {
    secret: SigningSecret,
    allow_list: AllowList,
    validity: Duration,
}

impl SessionTokenService {
    pub fn new(secret: SigningSecret, allow_list: AllowList, validity: Duration) -> Self {
        Self {
            secret,
            allow_list,
            validity,
        }
    }

    /// Mint a token for `email`, valid from now
    pub fn issue(&self, email: &str) -> Result<IssuedToken, AuthError> {
        self.issue_at(email, Utc::now())
    }

    /// Mint a token as of `now`
    pub fn issue_at(&self, email: &str, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        if !self.allow_list.is_allowed(email) {
            tracing::info!(email = %email, "Refusing to issue token for unlisted identity");
            return Err(AuthError::NotAuthorized);
        }

        let validity = chrono::Duration::from_std(self.validity)
            .map_err(|e| AuthError::Configuration(format!("token validity out of range: {e}")))?;
        let expires_at = now.checked_add_signed(validity).ok_or_else(|| {
            AuthError::Configuration("token validity overflows the calendar".to_string())
        })?;

        let claims = SessionClaims {
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            self.secret.encoding_key(),
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign session token");
            AuthError::Internal("failed to sign session token".to_string())
        })?;

        Ok(IssuedToken {
            token,
            expires_at: Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .unwrap_or(expires_at),
        })
    }

    /// Validate a raw token and return the authorized email
    pub fn validate(&self, raw_token: &str) -> Result<String, AuthError> {
        self.validate_at(raw_token, Utc::now())
    }

    /// Validate a raw token as of `now`
    pub fn validate_at(&self, raw_token: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        if raw_token.is_empty() {
            return Err(AuthError::MalformedRequest("empty bearer token".to_string()));
        }

        // Only HS256 is accepted; anything else is an algorithm-confusion attempt
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = decode::<SessionClaims>(raw_token, self.secret.decoding_key(), &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                AuthError::InvalidSignature
            })?
            .claims;

        // Checked here regardless of what the JWT library would do
        if now.timestamp() >= claims.exp {
            tracing::debug!(email = %claims.email, exp = claims.exp, "Session token expired");
            return Err(AuthError::TokenExpired);
        }

        if !self.allow_list.is_allowed(&claims.email) {
            tracing::info!(email = %claims.email, "Session token holder no longer allow-listed");
            return Err(AuthError::NotAuthorized);
        }

        Ok(claims.email)
    }
}

/// Extract the credential from an `Authorization: <scheme> <token>` header
///
/// Any single-word scheme is accepted. A missing header, a lone scheme, or
/// extra whitespace-separated parts are all malformed.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header
        .ok_or_else(|| AuthError::MalformedRequest("missing authorization header".to_string()))?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if !scheme.is_empty() && !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedRequest(
            "malformed authorization header".to_string(),
        )),
    }
}

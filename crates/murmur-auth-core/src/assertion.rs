//! Third-party identity assertion (Google ID token) verification

use chrono::Utc;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::keys::KeyFetcher;
use crate::AuthError;

/// Claims carried by a provider-signed identity assertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (provider user id)
    #[serde(default)]
    pub sub: Option<String>,
    /// Email address asserted by the provider
    pub email: String,
    /// Whether the provider verified the email address
    #[serde(default, deserialize_with = "bool_or_string")]
    pub email_verified: bool,
    /// Issuer
    pub iss: String,
    /// Audience (the OAuth client the assertion was minted for)
    pub aud: String,
    /// Expiration timestamp (seconds)
    pub exp: i64,
}

/// Identity that survived every assertion check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentityClaims {
    pub email: String,
}

/// Verifies provider-signed identity assertions
#[derive(Clone)]
pub struct IdentityAssertionVerifier {
    keys: Arc<dyn KeyFetcher>,
    accepted_issuers: Vec<String>,
}

impl IdentityAssertionVerifier {
    /// Create a verifier accepting the given issuers
    pub fn new(keys: Arc<dyn KeyFetcher>, accepted_issuers: Vec<String>) -> Self {
        Self {
            keys,
            accepted_issuers,
        }
    }

    /// Verify an assertion against the current time
    pub async fn verify(
        &self,
        raw_assertion: &str,
        expected_audience: &str,
    ) -> Result<VerifiedIdentityClaims, AuthError> {
        self.verify_at(raw_assertion, expected_audience, Utc::now().timestamp())
            .await
    }

    /// Verify an assertion as of `now` (unix seconds)
    ///
    /// Checks run in a fixed order: signature, issuer, audience, expiry,
    /// email verification. Nothing in the payload is trusted until the
    /// signature has been checked.
    pub async fn verify_at(
        &self,
        raw_assertion: &str,
        expected_audience: &str,
        now: i64,
    ) -> Result<VerifiedIdentityClaims, AuthError> {
        let header = decode_header(raw_assertion).map_err(|e| {
            tracing::debug!(error = %e, "Failed to decode assertion header");
            AuthError::InvalidSignature
        })?;

        if header.alg != Algorithm::RS256 {
            tracing::debug!(alg = ?header.alg, "Unexpected assertion algorithm");
            return Err(AuthError::InvalidSignature);
        }

        let kid = header.kid.ok_or_else(|| {
            tracing::debug!("Assertion missing kid");
            AuthError::InvalidSignature
        })?;

        let key = self.keys.get_public_key(&kid).await?;

        // Claim checks below are done by hand so each failure gets its own error
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = decode::<IdentityClaims>(raw_assertion, &key, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Assertion signature verification failed");
                AuthError::InvalidSignature
            })?
            .claims;

        if !self.accepted_issuers.iter().any(|iss| *iss == claims.iss) {
            tracing::debug!(iss = %claims.iss, "Assertion issuer rejected");
            return Err(AuthError::InvalidIssuer);
        }

        let audience_matches: bool = claims
            .aud
            .as_bytes()
            .ct_eq(expected_audience.as_bytes())
            .into();
        if !audience_matches {
            tracing::debug!(aud = %claims.aud, "Assertion audience rejected");
            return Err(AuthError::InvalidAudience);
        }

        if claims.exp <= now {
            tracing::debug!(exp = claims.exp, now, "Assertion expired");
            return Err(AuthError::ExpiredAssertion);
        }

        if !claims.email_verified {
            tracing::debug!(email = %claims.email, "Assertion email not verified");
            return Err(AuthError::UnverifiedEmail);
        }

        Ok(VerifiedIdentityClaims {
            email: claims.email,
        })
    }
}

impl std::fmt::Debug for IdentityAssertionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityAssertionVerifier")
            .field("accepted_issuers", &self.accepted_issuers)
            .finish_non_exhaustive()
    }
}

/// Google has emitted `email_verified` both as a JSON bool and as a string
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => s.eq_ignore_ascii_case("true"),
    })
}

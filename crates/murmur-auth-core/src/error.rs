//! Auth errors

use thiserror::Error;

/// Authentication and authorization errors
///
/// Display strings are safe to show to clients. Anything more detailed is
/// logged where the error is raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Identity provider keys could not be fetched (caller may retry)
    #[error("identity provider unavailable")]
    Transport(String),

    /// Signature missing, wrong, made with an unknown key or an unexpected algorithm
    #[error("invalid signature")]
    InvalidSignature,

    /// Identity assertion issued by someone other than the provider
    #[error("invalid issuer")]
    InvalidIssuer,

    /// Identity assertion minted for a different client
    #[error("invalid audience")]
    InvalidAudience,

    /// Identity assertion is past its expiry
    #[error("identity assertion expired")]
    ExpiredAssertion,

    /// Provider has not verified the email address
    #[error("email not verified")]
    UnverifiedEmail,

    /// Identity is valid but not on the allow-list
    #[error("not authorized")]
    NotAuthorized,

    /// Request body or authorization header could not be parsed
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Session token is past its expiry
    #[error("token expired")]
    TokenExpired,

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MalformedRequest(_) => 400,
            Self::InvalidSignature
            | Self::InvalidIssuer
            | Self::InvalidAudience
            | Self::ExpiredAssertion
            | Self::TokenExpired => 401,
            Self::NotAuthorized | Self::UnverifiedEmail => 403,
            Self::Transport(_) => 503,
            Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "PROVIDER_UNAVAILABLE",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InvalidIssuer => "INVALID_ISSUER",
            Self::InvalidAudience => "INVALID_AUDIENCE",
            Self::ExpiredAssertion => "ASSERTION_EXPIRED",
            Self::UnverifiedEmail => "EMAIL_NOT_VERIFIED",
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::MalformedRequest(_) => "MALFORMED_REQUEST",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure came from a network hop and may succeed on retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Errors raised while resolving identity provider signing keys
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyFetchError {
    /// The provider's current key set has no key with this id
    #[error("signing key not found: {0}")]
    NotFound(String),

    /// Network or HTTP failure talking to the provider
    #[error("key set fetch failed: {0}")]
    Transport(String),

    /// The provider answered with something that is not a usable key set
    #[error("invalid key set: {0}")]
    InvalidKeySet(String),
}

impl From<KeyFetchError> for AuthError {
    fn from(err: KeyFetchError) -> Self {
        match err {
            KeyFetchError::NotFound(kid) => {
                tracing::debug!(kid = %kid, "Signing key not published by provider");
                Self::InvalidSignature
            }
            KeyFetchError::Transport(detail) | KeyFetchError::InvalidKeySet(detail) => {
                tracing::error!(error = %detail, "Failed to resolve provider signing keys");
                Self::Transport(detail)
            }
        }
    }
}

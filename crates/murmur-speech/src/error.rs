//! Speech synthesis errors

use thiserror::Error;

/// Speech synthesis errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// Text rejected before reaching the provider
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Provider unreachable or answered with a non-success status
    #[error("provider error: {0}")]
    Provider(String),

    /// Provider answered but the payload could not be decoded
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Provider could not be set up
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SpeechError {
    /// HTTP status a handler should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Provider(_) | Self::InvalidResponse(_) => 502,
            Self::Configuration(_) => 500,
        }
    }

    /// Check if this error came from the upstream provider
    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::InvalidResponse(_))
    }
}

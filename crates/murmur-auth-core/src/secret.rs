//! Symmetric signing secret for first-party tokens

use jsonwebtoken::{DecodingKey, EncodingKey};
use std::sync::Arc;

/// Pre-built HS256 keys derived from the service secret.
///
/// Building `EncodingKey`/`DecodingKey` once avoids copying the secret on
/// every request. The secret bytes never appear in `Debug` output.
#[derive(Clone)]
pub struct SigningSecret {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    len: usize,
}

impl SigningSecret {
    /// Minimum allowed secret length in bytes (256 bits)
    pub const MIN_LENGTH: usize = 32;

    /// Create a signing secret from raw bytes.
    ///
    /// # Errors
    /// Returns error if the secret is shorter than 32 bytes.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, SecretError> {
        let bytes = secret.as_ref();
        if bytes.len() < Self::MIN_LENGTH {
            return Err(SecretError::TooShort {
                actual: bytes.len(),
                minimum: Self::MIN_LENGTH,
            });
        }
        Ok(Self {
            encoding: Arc::new(EncodingKey::from_secret(bytes)),
            decoding: Arc::new(DecodingKey::from_secret(bytes)),
            len: bytes.len(),
        })
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningSecret")
            .field("length", &self.len)
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when creating a signing secret
#[derive(Debug, Clone, thiserror::Error)]
pub enum SecretError {
    #[error("signing secret too short: got {actual} bytes, need at least {minimum}")]
    TooShort { actual: usize, minimum: usize },
}

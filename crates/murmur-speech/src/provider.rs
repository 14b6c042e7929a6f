//! Speech synthesizer abstraction

use async_trait::async_trait;

use crate::SpeechError;

/// Speech synthesizer trait
///
/// Abstracts the synthesis backend so handlers can be driven by a fake in
/// tests.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` spoken in `language_code` (BCP-47), returning MP3 bytes
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, SpeechError>;
}

//! Google Cloud Text-to-Speech provider

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::{SpeechConfig, MAX_INPUT_BYTES};
use crate::error::SpeechError;
use crate::provider::SpeechSynthesizer;

/// Synthesizes MP3 audio through the `text:synthesize` REST method
#[derive(Clone, Debug)]
pub struct GoogleSpeechProvider {
    client: Client,
    config: SpeechConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    ssml_gender: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

impl GoogleSpeechProvider {
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SpeechError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: SpeechConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/text:synthesize", self.config.base_url)
    }
}

fn check_input(text: &str, language_code: &str) -> Result<(), SpeechError> {
    if text.trim().is_empty() {
        return Err(SpeechError::InvalidInput("text is empty".to_string()));
    }
    if text.len() > MAX_INPUT_BYTES {
        return Err(SpeechError::InvalidInput(format!(
            "text is {} bytes, limit is {MAX_INPUT_BYTES}",
            text.len()
        )));
    }
    if language_code.trim().is_empty() {
        return Err(SpeechError::InvalidInput(
            "language code is empty".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeechProvider {
    #[instrument(skip(self, text), fields(text_bytes = text.len()))]
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, SpeechError> {
        check_input(text, language_code)?;

        let body = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code,
                ssml_gender: self.config.voice_gender.as_str(),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        debug!(voice_gender = %self.config.voice_gender, "Requesting speech synthesis");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // reqwest includes the URL, and with it the key, in its Display
                error!(error = %e.without_url(), "Speech synthesis request failed");
                SpeechError::Provider("synthesis request failed".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Speech provider error");
            return Err(SpeechError::Provider(format!(
                "speech provider returned {status}"
            )));
        }

        let payload: SynthesizeResponse = response.json().await.map_err(|e| {
            error!(error = %e.without_url(), "Failed to parse speech provider response");
            SpeechError::InvalidResponse("response is not valid JSON".to_string())
        })?;

        let encoded = payload.audio_content.ok_or_else(|| {
            error!("Speech provider response carried no audio");
            SpeechError::InvalidResponse("missing audioContent".to_string())
        })?;

        let audio = STANDARD.decode(encoded.as_bytes()).map_err(|e| {
            error!(error = %e, "Speech provider returned undecodable audio");
            SpeechError::InvalidResponse("audioContent is not valid base64".to_string())
        })?;

        debug!(audio_bytes = audio.len(), "Speech synthesized");
        Ok(audio)
    }
}

//! Speech synthesis configuration

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Google Cloud Text-to-Speech REST endpoint
pub const GOOGLE_TTS_BASE_URL: &str = "https://texttospeech.googleapis.com";

/// Largest input the provider accepts in one request
pub const MAX_INPUT_BYTES: usize = 5000;

/// SSML voice gender requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoiceGender {
    #[default]
    Female,
    Male,
    Neutral,
}

impl VoiceGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "FEMALE",
            Self::Male => "MALE",
            Self::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoiceGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FEMALE" => Ok(Self::Female),
            "MALE" => Ok(Self::Male),
            "NEUTRAL" => Ok(Self::Neutral),
            other => Err(format!("unknown voice gender: {other}")),
        }
    }
}

/// Speech provider configuration
#[derive(Clone)]
pub struct SpeechConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL of the synthesis API
    pub base_url: String,
    /// Voice gender used for every request
    pub voice_gender: VoiceGender,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl SpeechConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: GOOGLE_TTS_BASE_URL.to_string(),
            voice_gender: VoiceGender::default(),
            request_timeout: Duration::from_secs(20),
        }
    }

    /// Point at a different API host (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_voice_gender(mut self, gender: VoiceGender) -> Self {
        self.voice_gender = gender;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("voice_gender", &self.voice_gender)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

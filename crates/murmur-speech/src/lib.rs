//! Murmur Speech - Text-to-speech synthesis
//!
//! Turns submitted text into MP3 audio through the Google Cloud
//! Text-to-Speech REST API.
//!
//! # Example
//!
//! ```rust,ignore
//! use murmur_speech::{GoogleSpeechProvider, SpeechConfig, SpeechSynthesizer};
//!
//! let provider = GoogleSpeechProvider::new(SpeechConfig::new(api_key))?;
//! let mp3 = provider.synthesize("Hello, World", "en-US").await?;
//! ```

pub mod config;
pub mod error;
pub mod google;
pub mod provider;

pub use config::{SpeechConfig, VoiceGender, GOOGLE_TTS_BASE_URL, MAX_INPUT_BYTES};
pub use error::SpeechError;
pub use google::GoogleSpeechProvider;
pub use provider::SpeechSynthesizer;

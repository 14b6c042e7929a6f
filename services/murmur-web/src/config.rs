//! Configuration for the Murmur web service.

use std::path::PathBuf;
use std::time::Duration;

use murmur_auth_core::{AllowList, AuthConfig, MAX_JWKS_CACHE_DURATION};
use murmur_speech::{SpeechConfig, VoiceGender};

/// About a year
const MAX_TOKEN_VALIDITY_MINUTES: u64 = 366 * 24 * 60;

const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Murmur web configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Auth core configuration (client id, signing secret, allow-list)
    pub auth: AuthConfig,

    /// Speech provider configuration
    pub speech: SpeechConfig,

    /// Directory holding `templates/`
    pub working_directory: PathBuf,

    /// Language used when a submission does not name one
    pub default_language_code: String,

    /// Request timeout for page and API routes
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        // Server port
        let http_port = parse_or(&lookup, "PORT", 8080u16)?;

        // Google identity
        let client_id = required("GOOGLE_CLIENT_ID")?;

        // Session secret (minimum 32 bytes, enforced by AuthConfig)
        let jwt_secret = required("JWT_SECRET")?;

        // Unset means nobody may sign in
        let allow_list = AllowList::from_csv(&lookup("ALLOWED_EMAILS").unwrap_or_default());
        if allow_list.is_empty() {
            tracing::warn!("ALLOWED_EMAILS is empty; every login will be refused");
        }

        let token_validity_minutes = parse_bounded(
            &lookup,
            "TOKEN_VALIDITY_MINUTES",
            120,
            MAX_TOKEN_VALIDITY_MINUTES,
        )?;
        let token_validity_secs = token_validity_minutes
            .checked_mul(60)
            .ok_or(ConfigError::Invalid("TOKEN_VALIDITY_MINUTES"))?;
        let jwks_cache_secs = parse_bounded(
            &lookup,
            "JWKS_CACHE_SECS",
            3600,
            MAX_JWKS_CACHE_DURATION.as_secs(),
        )?;

        let auth = AuthConfig::try_new(client_id, jwt_secret.as_bytes(), allow_list)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_token_validity(Duration::from_secs(token_validity_secs))
            .with_jwks_cache_duration(Duration::from_secs(jwks_cache_secs));

        // Speech
        let tts_api_key = required("GOOGLE_TTS_API_KEY")?;
        let voice_gender: VoiceGender = match lookup("TTS_VOICE_GENDER") {
            Some(raw) if !raw.trim().is_empty() => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("TTS_VOICE_GENDER"))?,
            _ => VoiceGender::default(),
        };

        let request_timeout_secs =
            parse_bounded(&lookup, "REQUEST_TIMEOUT_SECS", 30, MAX_REQUEST_TIMEOUT_SECS)?;
        let request_timeout = Duration::from_secs(request_timeout_secs);

        // The synthesis call must give up before the router's timeout does, so
        // a slow provider still gets the rendered error page
        let speech = SpeechConfig::new(tts_api_key)
            .with_voice_gender(voice_gender)
            .with_request_timeout(speech_timeout(request_timeout));

        let working_directory = lookup("WORKING_DIRECTORY")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let default_language_code = lookup("DEFAULT_LANGUAGE_CODE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "en-US".to_string());

        Ok(Self {
            http_port,
            auth,
            speech,
            working_directory,
            default_language_code,
            request_timeout,
        })
    }

    /// Directory the page templates are read from
    pub fn templates_dir(&self) -> PathBuf {
        self.working_directory.join("templates")
    }
}

/// Four fifths of the request budget
fn speech_timeout(request_timeout: Duration) -> Duration {
    request_timeout * 4 / 5
}

/// Parse a whole number in `1..=max`, or take `default` when unset
fn parse_bounded<F>(
    lookup: &F,
    name: &'static str,
    default: u64,
    max: u64,
) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value: u64 = parse_or(lookup, name, default)?;
    if value == 0 || value > max {
        return Err(ConfigError::Invalid(name));
    }
    Ok(value)
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|_| ConfigError::Invalid(name))
        }
        _ => Ok(default),
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}

//! Test harness for murmur-web router tests
//!
//! Builds the real router around an in-memory provider key and a counting
//! fake synthesizer.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use murmur_auth_core::{AuthService, KeyFetchError, KeyFetcher};
use murmur_speech::{SpeechError, SpeechSynthesizer};
use murmur_web::pages::Pages;
use murmur_web::{build_router, AppState, Config};
use serde_json::json;

pub const CLIENT_ID: &str = "murmur-test-client.apps.googleusercontent.com";
pub const JWT_SECRET: &str = "murmur-web-test-secret-0123456789abcdef";
pub const ALLOWED_EMAIL: &str = "alice@example.com";
pub const KEY_ID: &str = "murmur-test-kid-1";

pub const FAKE_MP3: &[u8] = &[0xFF, 0xFB, 0x90, 0x64, 0x00, 0x0F];

const PROVIDER_KEY_PEM: &str =
    include_str!("../../../../crates/murmur-auth-core/tests/fixtures/provider_signing_key.pem");
const PROVIDER_KEY_N: &str = "5WMFqdLxOHpOvDjprk3XUd303s7N19HalM6E4drCRsptXshPlGAOwXe92iovJmMHYCYUqhAQ3NTlE566YObizIfe41ZoJRto0wnT67cdGUN__aJRXuOqexTkL02HQEWd1YQ0PXgNU8iklfNiGOfiGlZhFPJ4WKuItcg24giDl6LqV27LjjSl1bbQKPMDg09YDo9jE0fY5IP1hvzuWm0MsEipC9FUrII8TZi27KPYTTD_wLfyJ6HagHmC4q_SULwW_dwPU_nDOQN2EJgUAgpukBYN5eKK8MZ_4sACz8S8P_l9aH-WwbCnJR1WOFJ0CezmTzoQshui7jAd_JepHf61RQ";

/// Serves the provider key from memory, or fails every lookup
pub struct StaticKeys {
    reachable: bool,
}

#[async_trait]
impl KeyFetcher for StaticKeys {
    async fn get_public_key(&self, kid: &str) -> Result<Arc<DecodingKey>, KeyFetchError> {
        if !self.reachable {
            return Err(KeyFetchError::Transport("connection refused".to_string()));
        }
        if kid != KEY_ID {
            return Err(KeyFetchError::NotFound(kid.to_string()));
        }
        DecodingKey::from_rsa_components(PROVIDER_KEY_N, "AQAB")
            .map(Arc::new)
            .map_err(|e| KeyFetchError::InvalidKeySet(e.to_string()))
    }
}

/// Synthesizer that records every call
#[derive(Default)]
pub struct FakeSynthesizer {
    pub calls: AtomicUsize,
    pub last_language: std::sync::Mutex<Option<String>>,
    pub fail_with: Option<SpeechError>,
}

impl FakeSynthesizer {
    pub fn failing(err: SpeechError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, _text: &str, language_code: &str) -> Result<Vec<u8>, SpeechError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_language.lock().unwrap() = Some(language_code.to_string());
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(FAKE_MP3.to_vec()),
        }
    }
}

pub fn test_config() -> Config {
    let env: HashMap<&str, &str> = HashMap::from([
        ("GOOGLE_CLIENT_ID", CLIENT_ID),
        ("JWT_SECRET", JWT_SECRET),
        ("GOOGLE_TTS_API_KEY", "tts-key"),
        ("ALLOWED_EMAILS", ALLOWED_EMAIL),
        ("WORKING_DIRECTORY", "/nonexistent/murmur"),
    ]);
    Config::from_lookup(|name| env.get(name).map(|v| (*v).to_string())).unwrap()
}

pub struct TestApp {
    pub router: Router,
    pub speech: Arc<FakeSynthesizer>,
    pub auth: AuthService,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(Arc::new(FakeSynthesizer::default()), true)
    }

    pub fn with_synthesizer(speech: FakeSynthesizer) -> Self {
        Self::build(Arc::new(speech), true)
    }

    pub fn with_unreachable_provider() -> Self {
        Self::build(Arc::new(FakeSynthesizer::default()), false)
    }

    pub fn with_speech(speech: Arc<dyn SpeechSynthesizer>) -> Router {
        let config = test_config();
        let auth = AuthService::with_key_fetcher(
            config.auth.clone(),
            Arc::new(StaticKeys { reachable: true }),
        );
        build_router(AppState::new(auth, speech, Pages::default(), config))
    }

    fn build(speech: Arc<FakeSynthesizer>, reachable: bool) -> Self {
        let config = test_config();
        let auth =
            AuthService::with_key_fetcher(config.auth.clone(), Arc::new(StaticKeys { reachable }));
        let state = AppState::new(auth.clone(), speech.clone(), Pages::default(), config);
        Self {
            router: build_router(state),
            speech,
            auth,
        }
    }

    /// A session token for the allow-listed identity
    pub fn session_token(&self) -> String {
        self.auth.sessions().issue(ALLOWED_EMAIL).unwrap().token
    }
}

/// Sign a Google-shaped identity assertion with the provider key
pub fn google_assertion(email: &str, audience: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "sub": "108234567890123456789",
        "email": email,
        "email_verified": true,
        "iss": "https://accounts.google.com",
        "aud": audience,
        "iat": now,
        "exp": now + 3600,
    });

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(KEY_ID.to_string());
    let key = EncodingKey::from_rsa_pem(PROVIDER_KEY_PEM.as_bytes()).unwrap();
    encode(&header, &claims, &key).unwrap()
}

//! Application state

use std::sync::Arc;

use murmur_auth_core::AuthService;
use murmur_speech::SpeechSynthesizer;

use crate::config::Config;
use crate::pages::Pages;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Login and per-request authorization
    pub auth: Arc<AuthService>,
    /// Text-to-speech backend
    pub speech: Arc<dyn SpeechSynthesizer>,
    /// Rendered HTML pages
    pub pages: Arc<Pages>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        auth: AuthService,
        speech: Arc<dyn SpeechSynthesizer>,
        pages: Pages,
        config: Config,
    ) -> Self {
        Self {
            auth: Arc::new(auth),
            speech,
            pages: Arc::new(pages),
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

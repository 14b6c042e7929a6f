//! Murmur web service binary

use std::net::SocketAddr;
use std::sync::Arc;

use murmur_auth_core::AuthService;
use murmur_speech::GoogleSpeechProvider;
use murmur_web::pages::Pages;
use murmur_web::{build_router, shutdown_signal, AppState, Config};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("murmur_web=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Murmur");

    let config = Config::from_env()?;
    tracing::info!(
        http_port = config.http_port,
        allowed_emails = config.auth.allow_list.len(),
        working_directory = %config.working_directory.display(),
        "Configuration loaded"
    );

    let auth = AuthService::new(config.auth.clone());
    let speech = Arc::new(GoogleSpeechProvider::new(config.speech.clone())?);
    let pages = Pages::load(&config.templates_dir());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let state = AppState::new(auth, speech, pages, config);
    let app = build_router(state);

    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

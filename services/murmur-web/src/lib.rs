//! Murmur Web
//!
//! Turns text into speech for allow-listed Google accounts.
//!
//! ## Endpoints
//!
//! - `GET /login` - Sign-in page
//! - `POST /login` - Exchange a Google ID token for a session token
//! - `GET /` - Home page
//! - `POST /` - Convert text to an MP3 attachment (session token required)
//! - `GET /error?msg=` - Error page
//! - `GET /health` - Liveness probe

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod pages;
pub mod state;

use axum::routing::get;
use axum::Router;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub use config::{Config, ConfigError};
pub use state::AppState;

/// Build the HTTP router
pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout();

    let app_routes = Router::new()
        .route("/", get(handlers::home_page).post(handlers::submit_text))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/error", get(handlers::error_page));

    // Health route (no timeout - must always respond quickly)
    let health_routes = Router::new().route("/health", get(handlers::health));

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .merge(app_routes)
        .layer(middleware)
        .merge(health_routes)
        .with_state(state)
}

/// Resolves on ctrl-c or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

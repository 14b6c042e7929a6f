//! Login handlers

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Google ID token posted by the sign-in button callback
    #[serde(
        rename = "GoogleJWT",
        alias = "googleJWT",
        alias = "googlejwt",
        alias = "google_jwt"
    )]
    pub google_jwt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /login
///
/// The sign-in page needs the OAuth client id for the Google button.
pub async fn login_page(State(state): State<AppState>) -> Html<String> {
    Html(state.pages.login(&state.config.auth.client_id))
}

/// POST /login
///
/// Exchange a Google identity assertion for a session token
pub async fn login(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<LoginResponse>> {
    let req: LoginRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Undecodable login body");
        ApiError::BadRequest("error retrieving your token".to_string())
    })?;

    let assertion = req
        .google_jwt
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("error retrieving your token".to_string()))?;

    let issued = state.auth.login(&assertion).await?;

    Ok(Json(LoginResponse {
        token: issued.token,
    }))
}

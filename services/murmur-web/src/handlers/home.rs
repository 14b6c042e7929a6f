//! Home page and text submission

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::PageError;
use crate::extractors::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TextSubmission {
    pub text: String,
    #[serde(default, rename = "languageCode", alias = "language_code")]
    pub language_code: Option<String>,
}

/// GET /
pub async fn home_page(State(state): State<AppState>) -> Html<String> {
    Html(state.pages.home())
}

/// POST /
///
/// Convert the submitted text to MP3 and return it as an attachment.
/// `AuthUser` rejects before the body is read.
pub async fn submit_text(
    State(state): State<AppState>,
    user: AuthUser,
    body: Bytes,
) -> Result<Response, PageError> {
    let submission: TextSubmission = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, email = %user.email, "Undecodable text submission");
        PageError::new(
            state.pages.clone(),
            StatusCode::BAD_REQUEST,
            "error extracting your text.",
        )
    })?;

    let language_code = submission
        .language_code
        .filter(|code| !code.trim().is_empty())
        .unwrap_or_else(|| state.config.default_language_code.clone());

    tracing::info!(
        email = %user.email,
        language_code = %language_code,
        text_bytes = submission.text.len(),
        "Converting text to audio"
    );

    let audio = state
        .speech
        .synthesize(&submission.text, &language_code)
        .await
        .map_err(|e| PageError::from_speech(state.pages.clone(), &e))?;

    let disposition = format!("attachment; filename=\"{}\"", audio_filename(Utc::now()));

    Ok((
        [
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_TYPE, "audio/mpeg".to_string()),
            (header::CONTENT_LENGTH, audio.len().to_string()),
        ],
        audio,
    )
        .into_response())
}

/// Download name for audio produced at `at`
pub fn audio_filename(at: DateTime<Utc>) -> String {
    format!("sop_audio_{}.mp3", at.format("%Y%m%d%H%M%S"))
}

//! Error types for the Murmur web service.
//!
//! The login endpoint is called from script and answers failures with JSON
//! `{"message": ...}`. Text submissions answer failures with the rendered
//! error page.

use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use murmur_auth_core::AuthError;
use murmur_speech::SpeechError;
use serde::Serialize;

use crate::pages::Pages;

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Auth(e) => e.error_code(),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Auth(e) if e.is_retryable())
    }

    fn client_message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Auth(AuthError::Configuration(_) | AuthError::Internal(_)) => {
                "couldn't make authentication token".to_string()
            }
            Self::Auth(AuthError::MalformedRequest(_)) => "malformed request".to_string(),
            Self::Auth(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(error = ?self, code, "Login failed");
        } else {
            tracing::info!(error = %self, status = %status, code, "Login rejected");
        }

        let body = ErrorResponse {
            message: self.client_message(),
        };

        let mut response = (status, Json(body)).into_response();
        if self.is_retryable() {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from_static(RETRY_AFTER_SECS),
            );
        }
        response
    }
}

/// Seconds a client should wait before retrying after an unreachable provider
const RETRY_AFTER_SECS: &str = "5";

/// Result type for JSON API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure rendered as the HTML error page
#[derive(Debug, Clone)]
pub struct PageError {
    status: StatusCode,
    message: String,
    pages: Arc<Pages>,
}

impl PageError {
    pub fn new(pages: Arc<Pages>, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            pages,
        }
    }

    /// Authorization failure on a text submission
    pub fn from_auth(pages: Arc<Pages>, err: &AuthError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match err {
            AuthError::NotAuthorized => "Sorry. You are not known.",
            AuthError::TokenExpired => "Your session has expired. Please sign in again.",
            _ if status.is_server_error() => "Something went wrong. Please try again.",
            _ => "failed to authenticate",
        };
        tracing::info!(
            error = %err,
            status = %status,
            code = err.error_code(),
            "Text submission unauthorized"
        );
        Self::new(pages, status, message)
    }

    /// Synthesis failure on a text submission
    pub fn from_speech(pages: Arc<Pages>, err: &SpeechError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match err {
            SpeechError::InvalidInput(detail) => format!("error converting your text: {detail}"),
            _ => "error converting your text.".to_string(),
        };
        if err.is_provider_error() {
            tracing::error!(error = %err, status = %status, "Text conversion failed upstream");
        } else {
            tracing::warn!(error = %err, status = %status, "Text conversion failed");
        }
        Self::new(pages, status, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let html = self.pages.error(&self.message);
        (self.status, Html(html)).into_response()
    }
}

//! Axum extractors for authorization

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;
use murmur_auth_core::AuthError;

use crate::error::PageError;
use crate::state::AppState;

/// Allow-listed caller, taken from the `Authorization` header
///
/// Runs before any body extractor, so an unauthorized request is answered
/// without reading its body.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let authorization = match parts.headers.get(header::AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| {
                PageError::from_auth(
                    app_state.pages.clone(),
                    &AuthError::MalformedRequest("non-ASCII authorization header".to_string()),
                )
            })?),
            None => None,
        };

        let email = app_state
            .auth
            .authorize(authorization)
            .map_err(|e| PageError::from_auth(app_state.pages.clone(), &e))?;

        Ok(Self { email })
    }
}

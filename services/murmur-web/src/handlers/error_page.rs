//! Error page handler

use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ErrorQuery {
    pub msg: Option<String>,
}

/// GET /error?msg=... - Show a message on the error page
pub async fn error_page(
    State(state): State<AppState>,
    Query(query): Query<ErrorQuery>,
) -> Html<String> {
    let message = query.msg.unwrap_or_default();
    Html(state.pages.error(&message))
}

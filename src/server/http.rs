//! JSON API handlers

use axum::{
    extract::{rejection::JsonRejection, Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::server::ServerState;
use crate::types::{Category, Letter, NewLetter};

/// Query for `GET /api/letters`
#[derive(Debug, Default, Deserialize)]
pub struct LettersQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Query for `GET /api/letters/recent`
#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub letters: usize,
}

/// List letters, optionally filtered by category or shuffled
pub async fn list_letters_handler(
    State(state): State<ServerState>,
    Query(query): Query<LettersQuery>,
) -> Json<Vec<Letter>> {
    Json(state.archive_letters(query.category.as_deref(), query.shuffle, query.limit))
}

/// Newest letters first
pub async fn recent_letters_handler(
    State(state): State<ServerState>,
    Query(query): Query<RecentQuery>,
) -> Json<Vec<Letter>> {
    let limit = query.limit.unwrap_or(state.config.letters.recent_limit);
    Json(state.letters.recent(limit))
}

/// Submit a letter
pub async fn create_letter_handler(
    State(state): State<ServerState>,
    payload: Result<Json<NewLetter>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let letter = state.letters.add(req)?;
    Ok((StatusCode::CREATED, Json(letter)))
}

/// Labels offered by the archive filter
pub async fn categories_handler() -> Json<Vec<&'static str>> {
    Json(Category::ALL.iter().map(|c| c.as_str()).collect())
}

/// Status handler
pub async fn status_handler(State(state): State<ServerState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        letters: state.letters.len(),
    })
}

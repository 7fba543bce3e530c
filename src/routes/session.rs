//! Coding session API routes
//!
//! Projects the session operations: load a text, select a passage (raw
//! string or exact offsets), apply a code, clear the selection.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::coding::{Selection, SessionView};
use crate::db::{Segment, TextDocument};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the session router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(current_session))
        .route("/text", post(load_text))
        .route("/selection", post(select).delete(clear_selection))
        .route("/code", post(apply_code))
}

/// Request body for loading a text
#[derive(Debug, Deserialize)]
struct LoadTextRequest {
    title: String,
    content: String,
}

/// Request body for selecting a passage
///
/// Carries either the raw selected string or exact character offsets when
/// the hosting UI can supply them. Offsets take precedence.
#[derive(Debug, Deserialize)]
struct SelectRequest {
    text: Option<String>,
    start: Option<usize>,
    end: Option<usize>,
}

/// Request body for applying a code
#[derive(Debug, Deserialize)]
struct ApplyCodeRequest {
    #[serde(rename = "codeId")]
    code_id: String,
}

/// Current session state
async fn current_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session().view().await)
}

/// Load a new text into the session
async fn load_text(
    State(state): State<AppState>,
    Json(req): Json<LoadTextRequest>,
) -> Result<(StatusCode, Json<TextDocument>)> {
    let text = state.session().load_text(&req.title, &req.content).await?;
    Ok((StatusCode::CREATED, Json(text)))
}

/// Select a passage of the loaded text
async fn select(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<Selection>> {
    let session = state.session();
    let selection = match (req.start, req.end, req.text) {
        (Some(start), Some(end), _) => session.select_range(start, end).await?,
        (_, _, Some(text)) => session.select(&text).await?,
        _ => {
            return Err(AppError::BadRequest(
                "selection requires either text or start and end".to_string(),
            ))
        }
    };
    Ok(Json(selection))
}

/// Discard the pending selection
async fn clear_selection(State(state): State<AppState>) -> Result<StatusCode> {
    state.session().clear_selection().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Apply a code to the pending selection
async fn apply_code(
    State(state): State<AppState>,
    Json(req): Json<ApplyCodeRequest>,
) -> Result<(StatusCode, Json<Segment>)> {
    let segment = state.session().apply_code(&req.code_id).await?;
    Ok((StatusCode::CREATED, Json(segment)))
}

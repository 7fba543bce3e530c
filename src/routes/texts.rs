//! Text API routes

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::coding::{render, Fragment};
use crate::db::{Segment, SegmentRepository, TextDocument, TextRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the texts router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_texts))
        .route("/:id", get(get_text))
        .route("/:id/segments", get(list_text_segments))
        .route("/:id/fragments", get(render_text_fragments))
}

/// List all texts
async fn list_texts(State(state): State<AppState>) -> Result<Json<Vec<TextDocument>>> {
    let repo = TextRepository::new(state.db());
    let texts = repo.list().await?;
    Ok(Json(texts))
}

/// Get a specific text
async fn get_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TextDocument>> {
    let repo = TextRepository::new(state.db());
    let text = repo
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Text not found: {}", id)))?;
    Ok(Json(text))
}

/// List segments for a text, ordered by start offset
async fn list_text_segments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Segment>>> {
    TextRepository::new(state.db())
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Text not found: {}", id)))?;

    let segments = SegmentRepository::new(state.db()).list_for_text(&id).await?;
    Ok(Json(segments))
}

/// Render a text into display fragments with its coded segments applied
async fn render_text_fragments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Fragment>>> {
    let text = TextRepository::new(state.db())
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Text not found: {}", id)))?;

    let segments = SegmentRepository::new(state.db()).list_for_text(&id).await?;
    Ok(Json(render(&text.content, &segments)))
}

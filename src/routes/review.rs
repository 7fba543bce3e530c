//! Review listing API routes

use axum::{extract::State, routing::get, Json, Router};

use crate::db::{ReviewEntry, ReviewRepository};
use crate::error::Result;
use crate::state::AppState;

/// Create the review router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_review))
}

/// List all coded segments joined with their text and code, newest first
async fn list_review(State(state): State<AppState>) -> Result<Json<Vec<ReviewEntry>>> {
    let repo = ReviewRepository::new(state.db());
    let entries = repo.list().await?;
    Ok(Json(entries))
}

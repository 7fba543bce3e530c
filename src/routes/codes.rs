//! Code definition API routes

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::db::{Code, CodeRepository, CreateCode};
use crate::error::Result;
use crate::state::AppState;

/// Create the codes router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_codes).post(create_code))
}

/// List all codes
async fn list_codes(State(state): State<AppState>) -> Result<Json<Vec<Code>>> {
    let repo = CodeRepository::new(state.db());
    let codes = repo.list().await?;
    Ok(Json(codes))
}

/// Create a new code
async fn create_code(
    State(state): State<AppState>,
    Json(data): Json<CreateCode>,
) -> Result<(StatusCode, Json<Code>)> {
    let repo = CodeRepository::new(state.db());
    let code = repo.create(&data).await?;
    Ok((StatusCode::CREATED, Json(code)))
}

use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::palette::{GenerateResponse, LikedPalette},
    error::{AppError, ErrorBody},
    services::palette_service,
    state::SharedState,
};

/// Palette generation and listing routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/generate", get(generate))
        .route("/liked_palettes", get(liked_palettes))
}

/// Propose a new palette, chosen by the preference model once it has enough feedback.
#[utoipa::path(
    get,
    path = "/generate",
    tag = "palettes",
    responses(
        (status = 200, description = "Generated palette", body = GenerateResponse),
        (status = 503, description = "Storage unavailable", body = ErrorBody)
    )
)]
pub async fn generate(State(state): State<SharedState>) -> Result<Json<GenerateResponse>, AppError> {
    Ok(Json(palette_service::generate(&state).await?))
}

/// List palettes that received at least one like.
#[utoipa::path(
    get,
    path = "/liked_palettes",
    tag = "palettes",
    responses(
        (status = 200, description = "Liked palettes", body = [LikedPalette]),
        (status = 503, description = "Storage unavailable", body = ErrorBody)
    )
)]
pub async fn liked_palettes(
    State(state): State<SharedState>,
) -> Result<Json<Vec<LikedPalette>>, AppError> {
    Ok(Json(palette_service::liked_palettes(&state).await?))
}

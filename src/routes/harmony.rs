use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use validator::Validate;

use crate::{
    dto::harmony::{HarmonyRequest, HarmonyResponse},
    error::{AppError, ErrorBody},
    routes::json_body,
    services::harmony_service,
    state::SharedState,
};

/// Harmony routes.
pub fn router() -> Router<SharedState> {
    Router::new().route("/generate_harmony", post(generate_harmony))
}

/// Build an analogous, complementary, triad or tetrad palette around a base color.
#[utoipa::path(
    post,
    path = "/generate_harmony",
    tag = "palettes",
    request_body = HarmonyRequest,
    responses(
        (status = 200, description = "Harmony palette", body = HarmonyResponse),
        (status = 400, description = "Invalid color or scheme", body = ErrorBody),
        (status = 503, description = "Storage unavailable", body = ErrorBody)
    )
)]
pub async fn generate_harmony(
    State(state): State<SharedState>,
    payload: Result<Json<HarmonyRequest>, JsonRejection>,
) -> Result<Json<HarmonyResponse>, AppError> {
    let request = json_body(payload)?;
    request.validate()?;
    Ok(Json(harmony_service::generate_harmony(&state, request).await?))
}

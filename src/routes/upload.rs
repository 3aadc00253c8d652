use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::StatusCode,
    routing::post,
};
use tracing::debug;

use crate::{
    dto::upload::{UploadForm, UploadResponse},
    error::{AppError, ErrorBody},
    services::upload_service,
    state::SharedState,
};

/// Multipart field carrying the image.
const IMAGE_FIELD: &str = "image";

/// Upload route; bodies above `max_upload_bytes` are rejected with 413.
pub fn router(max_upload_bytes: usize) -> Router<SharedState> {
    Router::new()
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Extract the dominant colors of an uploaded image.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "palettes",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Extracted palette", body = UploadResponse),
        (status = 400, description = "No image in the form", body = ErrorBody),
        (status = 413, description = "Body exceeds the upload limit", body = ErrorBody),
        (status = 422, description = "File is not a decodable image", body = ErrorBody),
        (status = 503, description = "Storage unavailable", body = ErrorBody)
    )
)]
pub async fn upload(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(IMAGE_FIELD) {
            debug!(field = ?field.name(), "skipping multipart field");
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(multipart_error)?;
        let response = upload_service::upload_image(&state, file_name.as_deref(), bytes).await?;
        return Ok(Json(response));
    }

    Err(AppError::BadRequest(format!(
        "missing `{IMAGE_FIELD}` file field"
    )))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

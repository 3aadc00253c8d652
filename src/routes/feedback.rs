use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use validator::Validate;

use crate::{
    dto::feedback::{ActionResponse, FeedbackRequest},
    error::{AppError, ErrorBody},
    routes::json_body,
    services::feedback_service,
    state::SharedState,
};

/// Feedback routes.
pub fn router() -> Router<SharedState> {
    Router::new().route("/feedback", post(submit_feedback))
}

/// Like or dislike a palette; the preference model is retrained before responding.
///
/// A stored vote is acknowledged even if the retrain fails.
#[utoipa::path(
    post,
    path = "/feedback",
    tag = "feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback recorded", body = ActionResponse),
        (status = 400, description = "Malformed request", body = ErrorBody),
        (status = 404, description = "Unknown palette", body = ErrorBody),
        (status = 503, description = "Storage unavailable", body = ErrorBody)
    )
)]
pub async fn submit_feedback(
    State(state): State<SharedState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, AppError> {
    let request = json_body(payload)?;
    request.validate()?;
    Ok(Json(feedback_service::submit_feedback(&state, request).await?))
}

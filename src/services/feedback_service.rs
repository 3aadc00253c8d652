use tracing::{info, warn};

use crate::{
    dao::models::NewFeedback,
    dto::feedback::{ActionResponse, FeedbackRequest},
    engine::{
        features::encode,
        model::{ModelState, PreferenceModel, RetrainReport},
    },
    error::ServiceError,
    state::{PreferenceSnapshot, SharedState},
};

/// Record a like or dislike and retrain the model from the full corpus.
///
/// Once the vote is stored the call succeeds; a failed retrain keeps the previous model.
pub async fn submit_feedback(
    state: &SharedState,
    request: FeedbackRequest,
) -> Result<ActionResponse, ServiceError> {
    let store = state.require_palette_store().await?;
    let palette_id = request.palette_id;
    let not_found = || ServiceError::NotFound(format!("palette `{palette_id}` does not exist"));

    let palette = store.find_palette(palette_id).await?.ok_or_else(not_found)?;
    let liked = request.feedback.is_like();
    let features = encode(palette.colors()).to_vec();

    let record = store
        .record_feedback(NewFeedback {
            palette_id,
            liked,
            features,
        })
        .await?
        .ok_or_else(not_found)?;
    info!(palette_id, feedback_id = record.id, liked, "feedback recorded");

    if let Err(err) = retrain(state).await {
        warn!(palette_id, error = %err, "retrain failed; keeping previous preference model");
    }

    Ok(ActionResponse::new("Feedback received"))
}

/// Refit the preference model on every stored feedback record and swap it in.
pub async fn retrain(state: &SharedState) -> Result<RetrainReport, ServiceError> {
    let _gate = state.retrain_gate().await;
    let store = state.require_palette_store().await?;
    let corpus = store.list_feedback().await?;
    let params = state.config().training.clone();

    let (model, report) = tokio::task::spawn_blocking(move || {
        PreferenceModel::fit(
            corpus
                .iter()
                .map(|record| (record.features.as_slice(), record.liked)),
            &params,
        )
    })
    .await
    .map_err(|err| ServiceError::Internal(format!("retrain worker failed: {err}")))?;

    if report.discarded > 0 {
        warn!(
            discarded = report.discarded,
            "ignored feedback records with malformed features"
        );
    }
    match report.state {
        ModelState::Trained => info!(usable = report.usable, "preference model retrained"),
        ModelState::Untrained => info!(
            usable = report.usable,
            "preference model left untrained; both likes and dislikes are required"
        ),
    }

    state
        .install_preferences(PreferenceSnapshot {
            model,
            usable_feedback: report.usable,
        })
        .await;

    Ok(report)
}

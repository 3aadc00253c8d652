use tracing::debug;

use crate::{
    dao::models::{NewPalette, PaletteSource},
    dto::palette::{GenerateResponse, LikedPalette},
    engine::{color::HexColor, sampler::PaletteSampler, search::ScoreOutcome},
    error::ServiceError,
    state::SharedState,
};

/// Propose a fresh random palette, picked by the preference model when it can be trusted.
pub async fn generate(state: &SharedState) -> Result<GenerateResponse, ServiceError> {
    let mut sampler = PaletteSampler::from_os_rng();
    generate_with_sampler(state, &mut sampler).await
}

/// [`generate`] with an explicit random source.
pub async fn generate_with_sampler(
    state: &SharedState,
    sampler: &mut PaletteSampler,
) -> Result<GenerateResponse, ServiceError> {
    let store = state.require_palette_store().await?;

    let candidate = {
        let snapshot = state.preferences().await;
        state
            .search()
            .best_of(sampler, &snapshot.model, snapshot.usable_feedback)
    };

    let palette = store
        .create_palette(NewPalette {
            colors: candidate.colors.clone(),
            source: PaletteSource::Random,
            image_path: None,
        })
        .await?;
    debug!(palette_id = palette.id, outcome = ?candidate.outcome, "palette generated");

    Ok(GenerateResponse {
        palette_id: palette.id,
        colors: candidate.colors,
        proba: candidate.outcome.probability(),
    })
}

/// Palettes that received at least one like.
pub async fn liked_palettes(state: &SharedState) -> Result<Vec<LikedPalette>, ServiceError> {
    let store = state.require_palette_store().await?;
    let palettes = store.list_liked_palettes().await?;
    Ok(palettes.into_iter().map(LikedPalette::from).collect())
}

/// Score a palette built elsewhere against the current model snapshot.
pub(crate) async fn score_palette(state: &SharedState, colors: &[HexColor]) -> ScoreOutcome {
    let snapshot = state.preferences().await;
    state
        .search()
        .score(colors, &snapshot.model, snapshot.usable_feedback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dto::feedback::{FeedbackKind, FeedbackRequest},
        services::{feedback_service, test_support::memory_state},
    };

    async fn vote(state: &SharedState, palette_id: u64, feedback: FeedbackKind) {
        feedback_service::submit_feedback(
            state,
            FeedbackRequest {
                palette_id,
                feedback,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn untrained_model_yields_null_probability() {
        let state = memory_state(AppConfig::default()).await;
        let response = generate(&state).await.unwrap();

        assert_eq!(response.palette_id, 1);
        assert_eq!(response.colors.len(), 5);
        assert_eq!(response.proba, None);

        let store = state.require_palette_store().await.unwrap();
        let stored = store.find_palette(1).await.unwrap().unwrap();
        assert_eq!(stored.colors().cloned().collect::<Vec<_>>(), response.colors);
        assert_eq!(stored.source, PaletteSource::Random);
    }

    #[tokio::test]
    async fn trained_model_below_threshold_still_yields_null() {
        let state = memory_state(AppConfig::default()).await;
        let first = generate(&state).await.unwrap().palette_id;
        let second = generate(&state).await.unwrap().palette_id;
        vote(&state, first, FeedbackKind::Like).await;
        vote(&state, second, FeedbackKind::Dislike).await;
        assert!(state.preferences().await.model.is_trained());

        let response = generate(&state).await.unwrap();
        assert_eq!(response.proba, None);
    }

    #[tokio::test]
    async fn enough_feedback_yields_probability() {
        let state = memory_state(AppConfig::default()).await;
        let mut sampler = PaletteSampler::seeded(5);
        for round in 0..16 {
            let id = generate_with_sampler(&state, &mut sampler)
                .await
                .unwrap()
                .palette_id;
            let feedback = if round % 2 == 0 {
                FeedbackKind::Like
            } else {
                FeedbackKind::Dislike
            };
            vote(&state, id, feedback).await;
        }

        let response = generate_with_sampler(&state, &mut sampler).await.unwrap();
        let proba = response.proba.unwrap();
        assert!((0.0..=1.0).contains(&proba));
    }

    #[tokio::test]
    async fn liked_palettes_lists_only_liked() {
        let state = memory_state(AppConfig::default()).await;
        let liked = generate(&state).await.unwrap();
        let disliked = generate(&state).await.unwrap();
        vote(&state, liked.palette_id, FeedbackKind::Like).await;
        vote(&state, disliked.palette_id, FeedbackKind::Dislike).await;

        let palettes = liked_palettes(&state).await.unwrap();
        assert_eq!(palettes.len(), 1);
        assert_eq!(palettes[0].id, liked.palette_id);
        assert_eq!(palettes[0].likes, 1);
        assert_eq!(palettes[0].image, None);
        assert!(palettes[0].colors.iter().all(Option::is_some));
    }
}

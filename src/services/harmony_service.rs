use tracing::info;

use crate::{
    dao::models::{NewPalette, PaletteSource},
    dto::harmony::{HarmonyRequest, HarmonyResponse},
    engine::harmony,
    error::ServiceError,
    services::palette_service::score_palette,
    state::SharedState,
};

/// Build a harmony around the requested base color and store it as a palette.
pub async fn generate_harmony(
    state: &SharedState,
    request: HarmonyRequest,
) -> Result<HarmonyResponse, ServiceError> {
    let colors = harmony::generate(&request.base_color, &request.scheme)?;
    let store = state.require_palette_store().await?;

    let palette = store
        .create_palette(NewPalette {
            colors: colors.clone(),
            source: PaletteSource::Harmony,
            image_path: None,
        })
        .await?;
    info!(palette_id = palette.id, scheme = %request.scheme, "harmony palette created");

    let proba = score_palette(state, &colors).await.probability();
    Ok(HarmonyResponse {
        palette_id: palette.id,
        colors,
        proba,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, services::test_support::memory_state};

    fn request(base_color: &str, scheme: &str) -> HarmonyRequest {
        HarmonyRequest {
            base_color: base_color.into(),
            scheme: scheme.into(),
        }
    }

    #[tokio::test]
    async fn stores_harmony_palette() {
        let state = memory_state(AppConfig::default()).await;
        let response = generate_harmony(&state, request("ff0000", "complementary"))
            .await
            .unwrap();

        let colors: Vec<&str> = response.colors.iter().map(|c| c.as_str()).collect();
        assert_eq!(colors, ["#FF0000", "#00FFFF"]);
        assert_eq!(response.proba, None);

        let store = state.require_palette_store().await.unwrap();
        let palette = store.find_palette(response.palette_id).await.unwrap().unwrap();
        assert_eq!(palette.source, PaletteSource::Harmony);
        assert_eq!(palette.colors().count(), 2);
    }

    #[tokio::test]
    async fn invalid_input_creates_nothing() {
        let state = memory_state(AppConfig::default()).await;
        for (base, scheme) in [("not-a-color", "triad"), ("#FF0000", "bogus")] {
            let err = generate_harmony(&state, request(base, scheme))
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }

        let store = state.require_palette_store().await.unwrap();
        assert!(store.find_palette(1).await.unwrap().is_none());
    }
}

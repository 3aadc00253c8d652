use axum::body::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::models::{NewPalette, PaletteSource},
    dto::{
        palette::upload_url,
        upload::{UploadProba, UploadResponse},
    },
    engine::extractor::ExtractError,
    error::ServiceError,
    services::palette_service::score_palette,
    state::SharedState,
};

/// Extract a palette from an uploaded image, keep the image and store the palette.
///
/// Nothing is written when the bytes cannot be decoded.
pub async fn upload_image(
    state: &SharedState,
    file_name: Option<&str>,
    bytes: Bytes,
) -> Result<UploadResponse, ServiceError> {
    if bytes.is_empty() {
        return Err(ServiceError::InvalidInput("uploaded file is empty".into()));
    }
    let store = state.require_palette_store().await?;

    let extractor = state.extractor().clone();
    let clusters = extractor.default_clusters();
    let data = bytes.clone();
    let colors = tokio::task::spawn_blocking(move || extractor.extract(&data, clusters))
        .await
        .map_err(|err| ServiceError::Internal(format!("extraction worker failed: {err}")))?
        .map_err(|err| match err {
            ExtractError::InvalidClusterCount(_) => ServiceError::Internal(err.to_string()),
            ExtractError::Decode(_) | ExtractError::EmptyImage => {
                ServiceError::Decode(err.to_string())
            }
        })?;

    let stored_name = stored_file_name(file_name);
    let upload_dir = &state.config().upload_dir;
    let path = upload_dir.join(&stored_name);
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|err| ServiceError::Internal(format!("cannot create upload directory: {err}")))?;
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|err| ServiceError::Internal(format!("cannot store upload: {err}")))?;

    let created = store
        .create_palette(NewPalette {
            colors: colors.clone(),
            source: PaletteSource::Image,
            image_path: Some(stored_name.clone()),
        })
        .await;
    let palette = match created {
        Ok(palette) => palette,
        Err(err) => {
            if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %remove_err, "failed to remove orphaned upload");
            }
            return Err(err.into());
        }
    };
    info!(
        palette_id = palette.id,
        file = %stored_name,
        colors = colors.len(),
        "palette extracted from upload"
    );

    let proba = score_palette(state, &colors).await.probability();
    Ok(UploadResponse {
        palette_id: palette.id,
        colors,
        image: upload_url(&stored_name),
        proba: UploadProba::from(proba),
    })
}

/// Unique on-disk name for an upload: a random UUID followed by the sanitised client name.
fn stored_file_name(original: Option<&str>) -> String {
    format!(
        "{}_{}",
        Uuid::new_v4().simple(),
        sanitize_file_name(original.unwrap_or_default())
    )
}

/// Keep only the final path component and map anything outside `[A-Za-z0-9._-]` to `_`.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches(['.', '_']);
    if trimmed.is_empty() {
        "upload".to_owned()
    } else {
        trimmed.to_owned()
    }
}

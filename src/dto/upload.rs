use serde::Serialize;
use utoipa::ToSchema;

use crate::engine::color::HexColor;

/// Placeholder reported instead of a probability while the model is not trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PendingScore {
    /// Serialised as `"need_feedback"`.
    NeedFeedback,
}

/// Either a like probability or the `"need_feedback"` marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum UploadProba {
    /// Like probability in `[0, 1]`.
    Score(f64),
    /// Model not trusted yet.
    Pending(PendingScore),
}

impl From<Option<f64>> for UploadProba {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(p) => Self::Score(p),
            None => Self::Pending(PendingScore::NeedFeedback),
        }
    }
}

/// Multipart form accepted by `/upload`.
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// Image file; any format the decoder understands.
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Palette extracted from an uploaded image.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Id of the stored palette.
    pub palette_id: u64,
    /// Dominant colors, most frequent first.
    #[schema(value_type = Vec<String>)]
    pub colors: Vec<HexColor>,
    /// Public path of the stored image.
    pub image: String,
    /// Like probability, or `"need_feedback"` while the model is not trusted.
    pub proba: UploadProba,
}

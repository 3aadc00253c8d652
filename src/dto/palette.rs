use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dao::models::PaletteEntity,
    dto::format_system_time,
    engine::{color::HexColor, features::PALETTE_SLOTS},
};

/// Palette proposed by `/generate`.
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    /// Id to send back with feedback.
    pub palette_id: u64,
    /// Uppercase `#RRGGBB` colors.
    #[schema(value_type = Vec<String>, example = json!(["#E63946", "#F1FAEE", "#A8DADC", "#457B9D", "#1D3557"]))]
    pub colors: Vec<HexColor>,
    /// Predicted like probability; null until the model has enough feedback.
    pub proba: Option<f64>,
}

/// Palette listed by `/liked_palettes`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LikedPalette {
    /// Palette id.
    pub id: u64,
    /// Five slots; empty slots are null.
    #[schema(value_type = Vec<Option<String>>)]
    pub colors: [Option<HexColor>; PALETTE_SLOTS],
    /// Likes received.
    pub likes: u32,
    /// Dislikes received.
    pub dislikes: u32,
    /// Public path of the source image for uploaded palettes.
    pub image: Option<String>,
    /// RFC 3339 creation time.
    pub created_at: String,
}

impl From<PaletteEntity> for LikedPalette {
    fn from(palette: PaletteEntity) -> Self {
        Self {
            id: palette.id,
            colors: palette.colors,
            likes: palette.likes,
            dislikes: palette.dislikes,
            image: palette.image_path.map(|file| upload_url(&file)),
            created_at: format_system_time(palette.created_at),
        }
    }
}

/// Public URL under which a stored upload is served.
pub fn upload_url(file_name: &str) -> String {
    format!("/uploads/{file_name}")
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::validation::{validate_hex_color, validate_scheme},
    engine::color::HexColor,
};

/// Body of `POST /generate_harmony`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct HarmonyRequest {
    /// Base color as `#RRGGBB` or `RRGGBB`.
    #[schema(example = "#FF0000")]
    pub base_color: String,
    /// One of `analogous`, `complementary`, `triad`, `tetrad`.
    #[schema(example = "triad")]
    pub scheme: String,
}

impl Validate for HarmonyRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_hex_color(&self.base_color) {
            errors.add("base_color", e);
        }
        if let Err(e) = validate_scheme(&self.scheme) {
            errors.add("scheme", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Harmony palette; starts with the base color.
#[derive(Debug, Serialize, ToSchema)]
pub struct HarmonyResponse {
    /// Id of the stored harmony palette.
    pub palette_id: u64,
    /// Base color followed by the rotated hues.
    #[schema(value_type = Vec<String>)]
    pub colors: Vec<HexColor>,
    /// Predicted like probability; null until the model has enough feedback.
    pub proba: Option<f64>,
}

//! Hue-rotation color harmonies built from a single base color.

use std::str::FromStr;

use thiserror::Error;

use crate::engine::color::{ColorError, HexColor, HsvTriple, hsv_to_rgb};

/// Reasons a harmony cannot be generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarmonyError {
    /// Base color is not a valid hex color.
    #[error(transparent)]
    InvalidColor(#[from] ColorError),
    /// Scheme name is not one of the supported ones.
    #[error("unknown harmony scheme `{0}`")]
    UnknownScheme(String),
}

/// Named hue-rotation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarmonyScheme {
    /// Base plus neighbours at -30 and +30 degrees.
    Analogous,
    /// Base plus the opposite hue.
    Complementary,
    /// Three hues 120 degrees apart.
    Triad,
    /// Four hues 90 degrees apart.
    Tetrad,
}

impl HarmonyScheme {
    /// Hue offsets in degrees, starting with the base color.
    pub fn offsets(self) -> &'static [f32] {
        match self {
            Self::Analogous => &[0.0, -30.0, 30.0],
            Self::Complementary => &[0.0, 180.0],
            Self::Triad => &[0.0, 120.0, 240.0],
            Self::Tetrad => &[0.0, 90.0, 180.0, 270.0],
        }
    }
}

impl FromStr for HarmonyScheme {
    type Err = HarmonyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analogous" => Ok(Self::Analogous),
            "complementary" => Ok(Self::Complementary),
            "triad" => Ok(Self::Triad),
            "tetrad" => Ok(Self::Tetrad),
            _ => Err(HarmonyError::UnknownScheme(s.to_owned())),
        }
    }
}

/// Rotate the hue of `base` by every offset of `scheme`, keeping saturation and value.
pub fn harmonize(base: &HexColor, scheme: HarmonyScheme) -> Vec<HexColor> {
    let hsv = base.hsv();
    scheme
        .offsets()
        .iter()
        .map(|offset| {
            if *offset == 0.0 {
                return base.clone();
            }
            let rotated = HsvTriple::from_degrees(hsv.hue_degrees() + offset, hsv.s, hsv.v);
            HexColor::from_rgb(hsv_to_rgb(rotated))
        })
        .collect()
}

/// Parse a base color and scheme name, then generate the harmony.
pub fn generate(base_color: &str, scheme: &str) -> Result<Vec<HexColor>, HarmonyError> {
    let base = HexColor::parse(base_color)?;
    let scheme = scheme.parse::<HarmonyScheme>()?;
    Ok(harmonize(&base, scheme))
}

//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::engine::{color::HexColor, harmony::HarmonyScheme};

/// Validates that a color is six hexadecimal digits, optionally prefixed with `#`.
///
/// ```ignore
/// validate_hex_color("#1d3557") // Ok
/// validate_hex_color("1D3557")  // Ok
/// validate_hex_color("#12345")  // Err - too short
/// ```
pub fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    HexColor::parse(value).map(|_| ()).map_err(|err| {
        let mut e = ValidationError::new("hex_color");
        e.message = Some(err.to_string().into());
        e
    })
}

/// Validates that a harmony scheme name is known.
pub fn validate_scheme(value: &str) -> Result<(), ValidationError> {
    value.parse::<HarmonyScheme>().map(|_| ()).map_err(|err| {
        let mut e = ValidationError::new("harmony_scheme");
        e.message = Some(err.to_string().into());
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert!(validate_hex_color("#1d3557").is_ok());
        assert!(validate_hex_color("1D3557").is_ok());
        assert!(validate_hex_color("#12345").is_err());
        assert!(validate_hex_color("#GGGGGG").is_err());
    }

    #[test]
    fn schemes() {
        assert!(validate_scheme("tetrad").is_ok());
        assert!(validate_scheme("Analogous").is_ok());
        assert!(validate_scheme("square").is_err());
    }
}

//! Color conversions shared by the recommendation engine.
//!
//! RGB channels are `u8`, HSV components are unit floats (hue is a fraction of a full turn)
//! and LAB uses the D65 white point through the `palette` crate in both directions.

use std::{fmt, str::FromStr};

use palette::{Clamp, FromColor, Hsv, Lab, Srgb};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing user supplied colors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input is not six hexadecimal digits (optionally prefixed with `#`).
    #[error("invalid hex color `{0}`")]
    InvalidHex(String),
}

/// Hex color guaranteed to be formatted as `#RRGGBB` with uppercase digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse `RRGGBB` or `#RRGGBB` in any case and normalise it.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        hex_to_rgb(input).map(rgb_to_hex)
    }

    /// Build the canonical hex representation of an 8-bit RGB color.
    pub fn from_rgb(rgb: Srgb<u8>) -> Self {
        Self(format!("#{:02X}{:02X}{:02X}", rgb.red, rgb.green, rgb.blue))
    }

    /// Decode back into 8-bit RGB channels.
    pub fn to_rgb(&self) -> Srgb<u8> {
        // The constructor only ever stores validated strings.
        let bytes = self.0.as_bytes();
        let channel = |i: usize| {
            let hi = hex_digit(bytes[i]);
            let lo = hex_digit(bytes[i + 1]);
            (hi << 4) | lo
        };
        Srgb::new(channel(1), channel(3), channel(5))
    }

    /// HSV components of this color as unit floats.
    pub fn hsv(&self) -> HsvTriple {
        rgb_to_hsv(self.to_rgb())
    }

    /// Borrow the `#RRGGBB` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

/// HSV triple where every component lies in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HsvTriple {
    /// Hue as a fraction of a full turn.
    pub h: f32,
    /// Saturation.
    pub s: f32,
    /// Value.
    pub v: f32,
}

impl HsvTriple {
    /// Hue expressed in degrees, in `[0, 360)`.
    pub fn hue_degrees(&self) -> f32 {
        self.h * 360.0
    }

    /// Build a triple from a hue in degrees, wrapping it into a single turn.
    pub fn from_degrees(hue_deg: f32, s: f32, v: f32) -> Self {
        Self {
            h: unit_hue(hue_deg.rem_euclid(360.0)),
            s,
            v,
        }
    }
}

fn hex_digit(byte: u8) -> u8 {
    match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'f' => byte - b'a' + 10,
        b'A'..=b'F' => byte - b'A' + 10,
        _ => 0,
    }
}

fn unit_hue(degrees: f32) -> f32 {
    let h = degrees / 360.0;
    // rem_euclid can land on exactly 360.0 after rounding
    if (0.0..1.0).contains(&h) { h } else { 0.0 }
}

/// Parse six hex digits (optionally prefixed with `#`) into RGB channels.
pub fn hex_to_rgb(input: &str) -> Result<Srgb<u8>, ColorError> {
    let digits = input.trim().strip_prefix('#').unwrap_or(input.trim());
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(input.to_owned()));
    }

    let bytes = digits.as_bytes();
    let channel = |i: usize| (hex_digit(bytes[i]) << 4) | hex_digit(bytes[i + 1]);
    Ok(Srgb::new(channel(0), channel(2), channel(4)))
}

/// Format RGB channels as an uppercase `#RRGGBB` string.
pub fn rgb_to_hex(rgb: Srgb<u8>) -> HexColor {
    HexColor::from_rgb(rgb)
}

/// Convert 8-bit RGB into unit HSV.
pub fn rgb_to_hsv(rgb: Srgb<u8>) -> HsvTriple {
    let hsv: Hsv = Hsv::from_color(rgb.into_format::<f32>());
    HsvTriple {
        h: unit_hue(hsv.hue.into_positive_degrees()),
        s: hsv.saturation.clamp(0.0, 1.0),
        v: hsv.value.clamp(0.0, 1.0),
    }
}

/// Convert unit HSV back into 8-bit RGB.
pub fn hsv_to_rgb(hsv: HsvTriple) -> Srgb<u8> {
    let color: Hsv = Hsv::new(hsv.hue_degrees(), hsv.s, hsv.v);
    let rgb = Srgb::<f32>::from_color(color).clamp();
    rgb.into_format::<u8>()
}

/// Convert 8-bit sRGB into CIE L*a*b* (D65).
pub fn rgb_to_lab(rgb: Srgb<u8>) -> Lab {
    Lab::from_color(rgb.into_format::<f32>())
}

/// Convert CIE L*a*b* (D65) back into 8-bit sRGB, clamping out-of-gamut values.
pub fn lab_to_rgb(lab: Lab) -> Srgb<u8> {
    let rgb = Srgb::<f32>::from_color(lab).clamp();
    rgb.into_format::<u8>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Srgb<u8>, b: Srgb<u8>) {
        let diff = |x: u8, y: u8| (i16::from(x) - i16::from(y)).abs();
        assert!(
            diff(a.red, b.red) <= 1 && diff(a.green, b.green) <= 1 && diff(a.blue, b.blue) <= 1,
            "{a:?} vs {b:?}"
        );
    }

    #[test]
    fn parses_with_and_without_hash() {
        let red = HexColor::parse("#ff0000").unwrap();
        assert_eq!(red.as_str(), "#FF0000");
        assert_eq!(HexColor::parse("00ffAA").unwrap().as_str(), "#00FFAA");
        assert_eq!(red.to_rgb(), Srgb::new(255, 0, 0));
    }

    #[test]
    fn rejects_malformed_hex() {
        for input in ["", "#", "#FFF", "#FF00000", "not-a-color", "#GG0000", "##FF0000", "#ÿÿÿ"] {
            assert!(HexColor::parse(input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn deserialize_enforces_invariant() {
        let parsed: HexColor = serde_json::from_str("\"abcdef\"").unwrap();
        assert_eq!(parsed.as_str(), "#ABCDEF");
        assert!(serde_json::from_str::<HexColor>("\"xyz\"").is_err());
    }

    #[test]
    fn hsv_round_trip_within_one_step() {
        for r in (0..=255u16).step_by(17) {
            for g in (0..=255u16).step_by(17) {
                for b in (0..=255u16).step_by(15) {
                    let rgb = Srgb::new(r as u8, g as u8, b as u8);
                    let hsv = rgb_to_hsv(rgb);
                    assert!((0.0..1.0).contains(&hsv.h));
                    assert!((0.0..=1.0).contains(&hsv.s));
                    assert!((0.0..=1.0).contains(&hsv.v));
                    assert_close(hsv_to_rgb(hsv), rgb);
                }
            }
        }
    }

    #[test]
    fn lab_round_trip_within_one_step() {
        for rgb in [
            Srgb::new(0, 0, 0),
            Srgb::new(255, 255, 255),
            Srgb::new(12, 200, 77),
            Srgb::new(250, 3, 128),
            Srgb::new(90, 90, 91),
        ] {
            assert_close(lab_to_rgb(rgb_to_lab(rgb)), rgb);
        }
    }

    #[test]
    fn primary_hues() {
        assert_eq!(HexColor::parse("#FF0000").unwrap().hsv().h, 0.0);
        let green = HexColor::parse("#00FF00").unwrap().hsv();
        assert!((green.hue_degrees() - 120.0).abs() < 1e-3);
        let gray = HexColor::parse("#808080").unwrap().hsv();
        assert_eq!(gray.s, 0.0);
    }

    #[test]
    fn degrees_wrap_into_unit_turn() {
        let wrapped = HsvTriple::from_degrees(-30.0, 1.0, 1.0);
        assert!((wrapped.hue_degrees() - 330.0).abs() < 1e-3);
        assert_eq!(HsvTriple::from_degrees(360.0, 1.0, 1.0).h, 0.0);
    }
}

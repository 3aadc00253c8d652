use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::engine::{color::HexColor, features::PALETTE_SLOTS};

/// Where a stored palette came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaletteSource {
    /// Drawn by the candidate search.
    Random,
    /// Extracted from an uploaded image.
    Image,
    /// Built from a base color and a harmony scheme.
    Harmony,
}

/// Persisted palette with its feedback counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaletteEntity {
    /// Auto-incremented identifier, starting at 1.
    pub id: u64,
    /// Five color slots; trailing slots are empty for shorter palettes.
    pub colors: [Option<HexColor>; PALETTE_SLOTS],
    /// How the palette was produced.
    pub source: PaletteSource,
    /// File name of the uploaded image, relative to the upload directory.
    pub image_path: Option<String>,
    /// Likes received so far.
    pub likes: u32,
    /// Dislikes received so far.
    pub dislikes: u32,
    /// Insertion time.
    pub created_at: SystemTime,
}

impl PaletteEntity {
    /// Filled color slots in order.
    pub fn colors(&self) -> impl Iterator<Item = &HexColor> {
        self.colors.iter().flatten()
    }
}

/// Palette about to be stored; the store assigns id, counters and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPalette {
    /// Colors in display order; at most five are kept.
    pub colors: Vec<HexColor>,
    /// Origin of the palette.
    pub source: PaletteSource,
    /// Stored upload file name, for image palettes.
    pub image_path: Option<String>,
}

impl NewPalette {
    /// Colors laid out into fixed slots; anything past the fifth color is dropped.
    pub fn slots(&self) -> [Option<HexColor>; PALETTE_SLOTS] {
        into_slots(self.colors.iter().cloned())
    }
}

/// Lay colors out into the fixed slot array, leaving missing slots empty.
pub fn into_slots<I>(colors: I) -> [Option<HexColor>; PALETTE_SLOTS]
where
    I: IntoIterator<Item = HexColor>,
{
    let mut slots: [Option<HexColor>; PALETTE_SLOTS] = Default::default();
    for (slot, color) in slots.iter_mut().zip(colors) {
        *slot = Some(color);
    }
    slots
}

/// One like or dislike together with the features of the palette at vote time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackEntity {
    /// Auto-incremented identifier.
    pub id: u64,
    /// Palette the vote is about.
    pub palette_id: u64,
    /// `true` for a like.
    pub liked: bool,
    /// Encoded palette; legacy records may hold vectors of another length.
    pub features: Vec<f32>,
    /// Time the vote was recorded.
    pub created_at: SystemTime,
}

/// Feedback about to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    /// Palette being voted on.
    pub palette_id: u64,
    /// `true` for a like.
    pub liked: bool,
    /// Encoded palette at vote time.
    pub features: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_pad_and_truncate() {
        let colors: Vec<HexColor> = ["#111111", "#222222"]
            .iter()
            .map(|c| HexColor::parse(c).unwrap())
            .collect();
        let slots = into_slots(colors.clone());
        assert_eq!(slots[0].as_ref(), Some(&colors[0]));
        assert_eq!(slots[1].as_ref(), Some(&colors[1]));
        assert!(slots[2..].iter().all(Option::is_none));

        let many = std::iter::repeat_n(colors[0].clone(), 7);
        assert!(into_slots(many).iter().all(Option::is_some));
    }
}

//! Fixed-size numeric encoding of palettes used as classifier input.
//!
//! Colors are converted to HSV and sorted by hue before flattening, so two palettes holding
//! the same colors in a different order encode identically. Slot positions are deliberately
//! not part of the representation.

use thiserror::Error;

use crate::engine::color::{HexColor, HsvTriple};

/// Number of color slots in a palette.
pub const PALETTE_SLOTS: usize = 5;
/// Components per color slot (h, s, v).
const COMPONENTS: usize = 3;
/// Length of every feature vector.
pub const FEATURE_DIM: usize = PALETTE_SLOTS * COMPONENTS;

/// Reasons a raw feature list cannot be used as a [`FeatureVector`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Wrong number of components.
    #[error("expected {FEATURE_DIM} features, got {0}")]
    Length(usize),
    /// A component is outside `[0, 1]` or not finite.
    #[error("feature {index} is outside [0, 1]: {value}")]
    OutOfRange {
        /// Position of the offending component.
        index: usize,
        /// The rejected value.
        value: f32,
    },
}

/// Exactly [`FEATURE_DIM`] components, each within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f32; FEATURE_DIM]);

impl FeatureVector {
    /// Borrow the flattened components.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Copy the components into a plain list for persistence.
    pub fn to_vec(&self) -> Vec<f32> {
        self.0.to_vec()
    }
}

impl TryFrom<&[f32]> for FeatureVector {
    type Error = FeatureError;

    fn try_from(values: &[f32]) -> Result<Self, Self::Error> {
        let array: [f32; FEATURE_DIM] = values
            .try_into()
            .map_err(|_| FeatureError::Length(values.len()))?;

        if let Some((index, value)) = array
            .iter()
            .enumerate()
            .find(|(_, value)| !(0.0..=1.0).contains(*value))
        {
            return Err(FeatureError::OutOfRange {
                index,
                value: *value,
            });
        }

        Ok(Self(array))
    }
}

/// Encode up to [`PALETTE_SLOTS`] colors; extra colors are ignored, missing slots are
/// padded with black `(0, 0, 0)` before sorting.
pub fn encode<'a, I>(colors: I) -> FeatureVector
where
    I: IntoIterator<Item = &'a HexColor>,
{
    let mut triples = [HsvTriple::default(); PALETTE_SLOTS];
    for (slot, color) in triples.iter_mut().zip(colors) {
        *slot = color.hsv();
    }

    triples.sort_by(|a, b| {
        a.h.total_cmp(&b.h)
            .then(a.s.total_cmp(&b.s))
            .then(a.v.total_cmp(&b.v))
    });

    let mut features = [0.0; FEATURE_DIM];
    for (chunk, triple) in features.chunks_exact_mut(COMPONENTS).zip(triples) {
        chunk.copy_from_slice(&[triple.h, triple.s, triple.v]);
    }
    FeatureVector(features)
}

/// Hex, RGB, HSV and LAB conversions.
pub mod color;
/// Dominant color extraction from images.
pub mod extractor;
/// Palette to feature vector encoding.
pub mod features;
/// Deterministic hue-rotation harmonies.
pub mod harmony;
/// Logistic preference classifier.
pub mod model;
/// Random palette source.
pub mod sampler;
/// Best-of-N candidate search.
pub mod search;

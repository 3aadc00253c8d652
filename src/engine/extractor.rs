//! Dominant-color extraction from uploaded images.
//!
//! Images are downscaled to a fixed square, clustered in CIE LAB with a fixed seed and the
//! centroids are returned most populated first.

use std::collections::BTreeMap;

use image::imageops::FilterType;
use kmeans_colors::get_kmeans;
use palette::{Lab, Srgb};
use serde::Deserialize;
use thiserror::Error;

use crate::engine::{
    color::{HexColor, lab_to_rgb, rgb_to_lab},
    features::PALETTE_SLOTS,
};

/// Largest cluster count accepted by [`ImagePaletteExtractor::extract`].
pub const MAX_CLUSTERS: usize = PALETTE_SLOTS;

/// Failures while turning image bytes into a palette.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Bytes are not an image any enabled decoder understands.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    /// Decoded image has no pixels.
    #[error("image has no pixels")]
    EmptyImage,
    /// Requested cluster count is zero or above [`MAX_CLUSTERS`].
    #[error("cluster count must be between 1 and {MAX_CLUSTERS}, got {0}")]
    InvalidClusterCount(usize),
}

/// Tunables for the extraction pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Side of the square the image is resized to before clustering.
    pub resize: u32,
    /// Number of clusters requested by the upload endpoint.
    pub clusters: usize,
    /// Upper bound on k-means iterations.
    pub max_iterations: usize,
    /// Centroid movement below which k-means stops early.
    pub convergence: f32,
    /// Seed for centroid initialisation; fixed so results are reproducible.
    pub seed: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            resize: 100,
            clusters: PALETTE_SLOTS,
            max_iterations: 20,
            convergence: 1e-4,
            seed: 42,
        }
    }
}

/// Extracts dominant colors with k-means over LAB pixels.
#[derive(Debug, Clone, Default)]
pub struct ImagePaletteExtractor {
    config: ExtractorConfig,
}

impl ImagePaletteExtractor {
    /// Extractor using `config`.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Cluster count configured for uploads.
    pub fn default_clusters(&self) -> usize {
        self.config.clusters
    }

    /// Decode `bytes` and return exactly `k` dominant colors, most populated first.
    ///
    /// When the downscaled image holds `k` distinct colors or fewer, clustering is skipped
    /// and those colors are repeated, most frequent first, until there are `k`.
    pub fn extract(&self, bytes: &[u8], k: usize) -> Result<Vec<HexColor>, ExtractError> {
        if k == 0 || k > MAX_CLUSTERS {
            return Err(ExtractError::InvalidClusterCount(k));
        }

        let image = image::load_from_memory(bytes)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(ExtractError::EmptyImage);
        }

        let side = self.config.resize.max(1);
        let pixels = image
            .resize_exact(side, side, FilterType::Triangle)
            .to_rgb8();

        let mut counts: BTreeMap<[u8; 3], usize> = BTreeMap::new();
        for pixel in pixels.pixels() {
            *counts.entry(pixel.0).or_default() += 1;
        }

        if counts.len() <= k {
            let mut distinct: Vec<([u8; 3], usize)> = counts.into_iter().collect();
            distinct.sort_by(|a, b| b.1.cmp(&a.1));
            return Ok(distinct
                .iter()
                .cycle()
                .take(k)
                .map(|&([r, g, b], _)| HexColor::from_rgb(Srgb::new(r, g, b)))
                .collect());
        }

        let lab: Vec<Lab> = pixels
            .pixels()
            .map(|pixel| rgb_to_lab(Srgb::new(pixel[0], pixel[1], pixel[2])))
            .collect();

        let result = get_kmeans(
            k,
            self.config.max_iterations,
            self.config.convergence,
            false,
            &lab,
            self.config.seed,
        );

        let mut population = vec![0usize; result.centroids.len()];
        for &index in &result.indices {
            if let Some(count) = population.get_mut(usize::from(index)) {
                *count += 1;
            }
        }

        let mut order: Vec<usize> = (0..result.centroids.len()).collect();
        order.sort_by(|&a, &b| population[b].cmp(&population[a]));

        Ok(order
            .into_iter()
            .map(|i| HexColor::from_rgb(lab_to_rgb(result.centroids[i])))
            .collect())
    }
}

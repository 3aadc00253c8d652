//! Uniform random palettes used as search candidates.

use palette::Srgb;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::engine::color::HexColor;

/// Uniform random source of candidate palettes.
pub struct PaletteSampler {
    rng: StdRng,
}

impl PaletteSampler {
    /// Sampler seeded from operating system entropy.
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sampler, mainly for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw `n` colors with every channel uniform over `0..=255`.
    pub fn sample(&mut self, n: usize) -> Vec<HexColor> {
        (0..n)
            .map(|_| {
                let rgb = Srgb::new(
                    self.rng.random::<u8>(),
                    self.rng.random::<u8>(),
                    self.rng.random::<u8>(),
                );
                HexColor::from_rgb(rgb)
            })
            .collect()
    }
}

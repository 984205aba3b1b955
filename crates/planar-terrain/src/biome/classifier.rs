//! Biome classifier: maps a world position to a position in the biome cycle.
//!
//! The blend advances linearly with world Z, bent by a slow wobble in X and
//! roughened by a faint high-frequency term. Everything that needs a biome
//! (ground colour, landform override, flora and fauna selection) must go
//! through [`BiomeClassifier::classify`] so the boundaries agree.

use super::BiomeId;
use crate::noise_kernel::{fract, noise2d};
use crate::params::TerrainParameters;

/// Amplitude of the X wobble, in cycle units.
pub const X_VARIATION_AMPLITUDE: f32 = 0.08;
/// Frequency of the X wobble per world unit.
pub const X_VARIATION_FREQUENCY: f32 = 0.00035;
/// Amplitude of the edge roughening term, in cycle units.
pub const LOCAL_NOISE_AMPLITUDE: f32 = 0.015;
/// Frequency of the edge roughening term per world unit.
pub const LOCAL_NOISE_FREQUENCY: f32 = 0.004;

/// Result of classifying one position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeBlend {
    /// Continuous position in the cycle, in `[0, 1)`.
    pub blend: f32,
    /// Discrete slot, `floor(blend * biome_count)`, always `< biome_count`.
    pub biome_id: BiomeId,
}

impl BiomeBlend {
    /// Position inside the current slot, in `[0, 1)`.
    pub fn cell_fraction(&self, biome_count: u32) -> f32 {
        (self.blend * biome_count as f32 - self.biome_id.0 as f32).clamp(0.0, 1.0)
    }
}

/// Classifies world positions against a fixed biome count and cycle speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeClassifier {
    biome_count: u32,
    cycle_speed: f32,
    seed_offset: [f32; 2],
}

impl BiomeClassifier {
    /// Build a classifier from (already sanitized) parameters.
    pub fn new(params: &TerrainParameters) -> Self {
        Self {
            biome_count: params.biome_count.max(1),
            cycle_speed: params.biome_cycle_speed,
            seed_offset: params.seed_offset(),
        }
    }

    /// Number of slots in the cycle.
    pub fn biome_count(&self) -> u32 {
        self.biome_count
    }

    /// Classify a true (unwrapped) world position.
    pub fn classify(&self, world_x: f32, world_z: f32) -> BiomeBlend {
        let x = world_x + self.seed_offset[0];
        let z = world_z + self.seed_offset[1];
        self.classify_shifted(x, z)
    }

    /// Classify a position that already has the seed offset applied.
    pub(crate) fn classify_shifted(&self, x: f32, z: f32) -> BiomeBlend {
        let x_variation =
            X_VARIATION_AMPLITUDE * noise2d(x * X_VARIATION_FREQUENCY + 3.1, 7.9);
        let local = LOCAL_NOISE_AMPLITUDE
            * noise2d(x * LOCAL_NOISE_FREQUENCY, z * LOCAL_NOISE_FREQUENCY);
        let blend = fract(z * self.cycle_speed + x_variation + local);
        // fract can round up to exactly 1.0 for tiny negative inputs.
        let blend = if blend >= 1.0 { 0.0 } else { blend };

        let count = self.biome_count as f32;
        let id = (blend * count) as u32;
        BiomeBlend {
            blend,
            biome_id: BiomeId(id.min(self.biome_count - 1)),
        }
    }
}

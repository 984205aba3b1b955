//! Per-session terrain configuration and its normalization rules.
//!
//! Invalid values never reach the evaluators: [`TerrainParameters::sanitized`]
//! replaces each bad field with its default and logs the substitution, so the
//! height function cannot produce NaN or infinity.

use crate::biome::{BiomeDefinition, default_biomes};
use crate::seed::seed_offset;

/// Size of the GPU landform table; `biome_count` is clamped to this.
pub const MAX_BIOMES: u32 = 16;

/// Default `terrain_scale` (noise frequency per world unit).
pub const DEFAULT_TERRAIN_SCALE: f32 = 0.0005;
/// Default `terrain_height` (vertical amplitude in world units).
pub const DEFAULT_TERRAIN_HEIGHT: f32 = 35.0;
/// Default number of biomes in the cycle.
pub const DEFAULT_BIOME_COUNT: u32 = 5;
/// Default biome cycle speed: one full cycle every 5 000 units of Z.
pub const DEFAULT_BIOME_CYCLE_SPEED: f32 = 0.0002;

/// Largest accepted `terrain_scale`.
pub const MAX_TERRAIN_SCALE: f32 = 1.0;
/// Largest accepted `|terrain_height|`.
pub const MAX_TERRAIN_HEIGHT: f32 = 10_000.0;
/// Largest accepted `|biome_cycle_speed|`.
pub const MAX_BIOME_CYCLE_SPEED: f32 = 1.0;

/// Problems [`TerrainParameters::validate`] can report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainParamsError {
    /// `terrain_scale` is not in `(0, MAX_TERRAIN_SCALE]`.
    #[error("terrain scale must be within (0, {MAX_TERRAIN_SCALE}], got {0}")]
    ScaleOutOfRange(f32),
    /// `|terrain_height|` is NaN or above [`MAX_TERRAIN_HEIGHT`].
    #[error("terrain height must be within ±{MAX_TERRAIN_HEIGHT}, got {0}")]
    HeightOutOfRange(f32),
    /// `biome_count` is zero.
    #[error("biome count must be at least 1")]
    ZeroBiomes,
    /// `biome_count` exceeds [`MAX_BIOMES`].
    #[error("biome count {0} exceeds the maximum of {MAX_BIOMES}")]
    TooManyBiomes(u32),
    /// `|biome_cycle_speed|` is NaN or above [`MAX_BIOME_CYCLE_SPEED`].
    #[error("biome cycle speed must be within ±{MAX_BIOME_CYCLE_SPEED}, got {0}")]
    CycleSpeedOutOfRange(f32),
    /// `landform_blend` is outside `[0, 0.5]`.
    #[error("landform blend band must be within [0, 0.5], got {0}")]
    BlendOutOfRange(f32),
    /// A biome's landform has degenerate parameters.
    #[error("biome '{0}' has an invalid landform")]
    InvalidLandform(String),
}

/// Immutable-per-session terrain configuration.
///
/// Replace the whole value (or go through the sampler/facade setters) to
/// change it; any change invalidates cached height windows.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainParameters {
    /// Base noise frequency per world unit.
    pub terrain_scale: f32,
    /// Vertical amplitude in world units.
    pub terrain_height: f32,
    /// Number of slots in the biome cycle (≥ 1).
    pub biome_count: u32,
    /// How fast the biome blend advances per unit of world Z.
    pub biome_cycle_speed: f32,
    /// Width of the landform cross-fade band in cell-fraction units.
    /// `0.0` switches landforms hard at biome boundaries.
    pub landform_blend: f32,
    /// Ordered biome cycle. Slot `id` uses `biomes[id % len]`.
    pub biomes: Vec<BiomeDefinition>,
    seed: u64,
    seed_offset: [f32; 2],
}

impl Default for TerrainParameters {
    fn default() -> Self {
        Self {
            terrain_scale: DEFAULT_TERRAIN_SCALE,
            terrain_height: DEFAULT_TERRAIN_HEIGHT,
            biome_count: DEFAULT_BIOME_COUNT,
            biome_cycle_speed: DEFAULT_BIOME_CYCLE_SPEED,
            landform_blend: 0.0,
            biomes: default_biomes(),
            seed: 0,
            seed_offset: [0.0, 0.0],
        }
    }
}

impl TerrainParameters {
    /// Default parameters with the given seed applied.
    pub fn with_seed(seed: u64) -> Self {
        let mut params = Self::default();
        params.set_seed(seed);
        params
    }

    /// The world seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Additive world-space offset derived from the seed.
    pub fn seed_offset(&self) -> [f32; 2] {
        self.seed_offset
    }

    /// Change the seed and re-derive the world offset.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.seed_offset = seed_offset(seed);
    }

    /// Check every field, reporting the first problem found.
    ///
    /// # Errors
    ///
    /// Returns the [`TerrainParamsError`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), TerrainParamsError> {
        if !scale_in_range(self.terrain_scale) {
            return Err(TerrainParamsError::ScaleOutOfRange(self.terrain_scale));
        }
        if !(self.terrain_height.abs() <= MAX_TERRAIN_HEIGHT) {
            return Err(TerrainParamsError::HeightOutOfRange(self.terrain_height));
        }
        if self.biome_count == 0 {
            return Err(TerrainParamsError::ZeroBiomes);
        }
        if self.biome_count > MAX_BIOMES {
            return Err(TerrainParamsError::TooManyBiomes(self.biome_count));
        }
        if !(self.biome_cycle_speed.abs() <= MAX_BIOME_CYCLE_SPEED) {
            return Err(TerrainParamsError::CycleSpeedOutOfRange(
                self.biome_cycle_speed,
            ));
        }
        if !(0.0..=0.5).contains(&self.landform_blend) {
            return Err(TerrainParamsError::BlendOutOfRange(self.landform_blend));
        }
        if let Some(bad) = self.biomes.iter().find(|b| !b.landform.is_valid()) {
            return Err(TerrainParamsError::InvalidLandform(bad.name.clone()));
        }
        Ok(())
    }

    /// Return a copy with every invalid field replaced by a safe value.
    ///
    /// Never fails. Each substitution is logged at `warn`.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();

        if !scale_in_range(out.terrain_scale) {
            let fixed = if out.terrain_scale > MAX_TERRAIN_SCALE {
                MAX_TERRAIN_SCALE
            } else {
                DEFAULT_TERRAIN_SCALE
            };
            tracing::warn!(
                scale = out.terrain_scale,
                fixed,
                "terrain scale out of range, replacing"
            );
            out.terrain_scale = fixed;
        }
        if !(out.terrain_height.abs() <= MAX_TERRAIN_HEIGHT) {
            let fixed = if out.terrain_height.is_nan() {
                DEFAULT_TERRAIN_HEIGHT
            } else {
                out.terrain_height.clamp(-MAX_TERRAIN_HEIGHT, MAX_TERRAIN_HEIGHT)
            };
            tracing::warn!(
                height = out.terrain_height,
                fixed,
                "terrain height out of range, replacing"
            );
            out.terrain_height = fixed;
        }
        if out.biome_count == 0 || out.biome_count > MAX_BIOMES {
            let clamped = out.biome_count.clamp(1, MAX_BIOMES);
            tracing::warn!(
                count = out.biome_count,
                clamped,
                "biome count out of range, clamping"
            );
            out.biome_count = clamped;
        }
        if !(out.biome_cycle_speed.abs() <= MAX_BIOME_CYCLE_SPEED) {
            let fixed = if out.biome_cycle_speed.is_nan() {
                DEFAULT_BIOME_CYCLE_SPEED
            } else {
                out.biome_cycle_speed
                    .clamp(-MAX_BIOME_CYCLE_SPEED, MAX_BIOME_CYCLE_SPEED)
            };
            tracing::warn!(
                speed = out.biome_cycle_speed,
                fixed,
                "biome cycle speed out of range, replacing"
            );
            out.biome_cycle_speed = fixed;
        }
        if !(0.0..=0.5).contains(&out.landform_blend) {
            let clamped = if out.landform_blend.is_nan() {
                0.0
            } else {
                out.landform_blend.clamp(0.0, 0.5)
            };
            tracing::warn!(
                blend = out.landform_blend,
                clamped,
                "landform blend out of range, clamping"
            );
            out.landform_blend = clamped;
        }
        if out.biomes.len() > MAX_BIOMES as usize {
            tracing::warn!(
                len = out.biomes.len(),
                "biome list longer than the GPU table, truncating"
            );
            out.biomes.truncate(MAX_BIOMES as usize);
        }
        for biome in &mut out.biomes {
            if !biome.landform.is_valid() {
                tracing::warn!(biome = %biome.name, landform = ?biome.landform, "invalid landform, using natural");
                biome.landform = crate::biome::Landform::Natural;
            }
        }

        out
    }
}

fn scale_in_range(scale: f32) -> bool {
    scale > 0.0 && scale <= MAX_TERRAIN_SCALE
}

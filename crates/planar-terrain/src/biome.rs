//! Biome system: cyclic biome list, classification, and ground colour.
//!
//! Biomes are laid out as bands along world Z that repeat cyclically; the
//! classifier turns a position into a continuous blend plus a discrete slot.

mod classifier;
mod def;
mod palette;
mod registry;

pub use classifier::{
    BiomeBlend, BiomeClassifier, LOCAL_NOISE_AMPLITUDE, LOCAL_NOISE_FREQUENCY,
    X_VARIATION_AMPLITUDE, X_VARIATION_FREQUENCY,
};
pub use def::{
    BiomeDefinition, Landform, MAX_LANDFORM_MAGNITUDE, MAX_SINKHOLE_THRESHOLD,
    MIN_LANDFORM_LENGTH, Rgb, default_biomes, karst_biome,
};
pub use palette::{elevation_color, surface_color};
pub use registry::{BiomeId, BiomeRegistry, BiomeRegistryError};

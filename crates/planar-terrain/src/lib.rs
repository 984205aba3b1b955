//! Procedural planar terrain: seedless noise kernel, fractal composition, biome cycle, and the GPU evaluator source.

mod composer;
mod fractal;
mod noise_kernel;
mod params;
mod seed;

pub mod biome;
pub mod debug_viz;
pub mod shader;
pub mod shader_mirror;

pub use biome::{
    BiomeBlend, BiomeClassifier, BiomeDefinition, BiomeId, BiomeRegistry, BiomeRegistryError,
    Landform, Rgb, default_biomes, karst_biome, surface_color,
};
pub use composer::{
    CRATER_FREQUENCY, CRATER_THRESHOLD, DEPRESSION_THRESHOLD, HeightBreakdown,
    HeightFieldComposer, WARP_AMPLITUDE, WARP_FREQUENCY, apply_landform,
};
pub use debug_viz::{
    DebugImage, TerrainDebugState, WorldRegion, height_to_color, render_biome_debug,
    render_heightmap_debug, render_noise_debug,
};
pub use fractal::{GAIN, LACUNARITY, fbm, ridged_fbm};
pub use noise_kernel::{
    NOISE_NORMALIZATION, NoiseKernel, SIMPLEX_C, base_noise_layer, fract, noise2d,
};
pub use params::{
    DEFAULT_BIOME_COUNT, DEFAULT_BIOME_CYCLE_SPEED, DEFAULT_TERRAIN_HEIGHT,
    DEFAULT_TERRAIN_SCALE, MAX_BIOME_CYCLE_SPEED, MAX_BIOMES, MAX_TERRAIN_HEIGHT,
    MAX_TERRAIN_SCALE, TerrainParameters, TerrainParamsError,
};
pub use seed::{SEED_OFFSET_RANGE, seed_offset, smoothstep};
pub use shader::{TERRAIN_HEIGHT_WGSL, TerrainUniform};

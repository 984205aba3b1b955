//! Flyover runtime for the planar terrain: a cached height window that
//! follows the viewer, a floating-origin wrapper for far travel, and the
//! GPU/CPU bridge that renders windows with the same height function the
//! terrain shader draws.

pub mod bridge;
pub mod height_cache;
pub mod origin;
pub mod sampler;
pub mod terrain;

pub use bridge::{
    BridgeError, CpuHeightSource, GpuHeightSource, HEIGHT_WINDOW_WGSL, HeightSource,
    WindowUniform, compute_shader_source,
};
pub use height_cache::{HeightSampleCache, WindowSpec};
pub use origin::{CoordinateWrapper, WrapWindow};
pub use sampler::{CenterUpdate, HeightFieldSampler, MAX_RESOLUTION, SamplerConfig, SamplerStats};
pub use terrain::{GroundPlacement, PlanarTerrain, TerrainDescriptor, params_from_config};

//! GPU/CPU bridge: sources that render a height window for the sampler.
//!
//! Both sources evaluate the same height function. [`CpuHeightSource`] calls
//! the composer directly; [`GpuHeightSource`] dispatches a compute pass over
//! the WGSL evaluator and reads the result back.

mod cpu;
mod gpu;

pub use cpu::CpuHeightSource;
pub use gpu::{GpuHeightSource, HEIGHT_WINDOW_WGSL, WindowUniform, compute_shader_source};

use planar_terrain::TerrainParameters;

use crate::height_cache::WindowSpec;

/// Errors a height source can report.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    /// Failed to request GPU device.
    #[error("failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// The readback buffer could not be mapped.
    #[error("failed to map readback buffer: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    /// Waiting for the device failed.
    #[error("device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),

    /// The map callback was dropped without reporting.
    #[error("readback channel closed before the map completed")]
    ChannelClosed,

    /// The source produced the wrong number of heights.
    #[error("expected {expected} heights, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The window does not fit the device's buffer or dispatch limits.
    #[error("height window of {resolution}² nodes needs {bytes} bytes, device allows {limit}")]
    WindowTooLarge {
        resolution: u32,
        bytes: u64,
        limit: u64,
    },
}

/// Renders height windows for the sampler.
///
/// Implementations fill `out` with `window.node_count()` heights in
/// row-major order (`j` major), evaluated at [`WindowSpec::node`].
pub trait HeightSource {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Render one window.
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeError`] when the backend fails; `out` is then
    /// unspecified.
    fn render_window(
        &mut self,
        params: &TerrainParameters,
        window: &WindowSpec,
        out: &mut Vec<f32>,
    ) -> Result<(), BridgeError>;
}

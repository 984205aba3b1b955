//! GPU height source: compute pass over the WGSL evaluator with buffer readback.

use std::borrow::Cow;

use bytemuck::{Pod, Zeroable};
use planar_terrain::{TERRAIN_HEIGHT_WGSL, TerrainParameters, TerrainUniform};
use wgpu::util::DeviceExt;

use super::{BridgeError, HeightSource};
use crate::height_cache::WindowSpec;

const WORKGROUP_SIZE: u32 = 8;

/// Compute entry point appended to [`TERRAIN_HEIGHT_WGSL`].
pub const HEIGHT_WINDOW_WGSL: &str = r#"
struct WindowUniform {
    origin: vec2<f32>,
    spacing: f32,
    resolution: u32,
};

@group(0) @binding(1) var<uniform> height_window: WindowUniform;
@group(0) @binding(2) var<storage, read_write> heights: array<f32>;

@compute @workgroup_size(8, 8)
fn cs_height_window(@builtin(global_invocation_id) id: vec3<u32>) {
    let res = height_window.resolution;
    if (id.x >= res || id.y >= res) {
        return;
    }
    let x = height_window.origin.x + f32(id.x) * height_window.spacing;
    let z = height_window.origin.y + f32(id.y) * height_window.spacing;
    heights[id.y * res + id.x] = terrain_height(x, z);
}
"#;

/// Full WGSL module for the compute pipeline.
pub fn compute_shader_source() -> String {
    format!("{TERRAIN_HEIGHT_WGSL}\n{HEIGHT_WINDOW_WGSL}")
}

/// Uniform mirrored by `struct WindowUniform` in WGSL.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct WindowUniform {
    pub origin: [f32; 2],
    pub spacing: f32,
    pub resolution: u32,
}

impl From<&WindowSpec> for WindowUniform {
    fn from(w: &WindowSpec) -> Self {
        Self {
            origin: w.origin,
            spacing: w.spacing,
            resolution: w.resolution,
        }
    }
}

struct OutputBuffers {
    storage: wgpu::Buffer,
    staging: wgpu::Buffer,
    capacity: u64,
}

/// Renders height windows on the GPU.
pub struct GpuHeightSource {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    terrain_buffer: wgpu::Buffer,
    window_buffer: wgpu::Buffer,
    output: Option<OutputBuffers>,
    adapter_name: String,
}

impl GpuHeightSource {
    /// Create a source on its own headless device.
    ///
    /// # Errors
    ///
    /// [`BridgeError::NoAdapter`] when no adapter is available, or
    /// [`BridgeError::DeviceRequest`] when the device cannot be created.
    pub fn new_headless() -> Result<Self, BridgeError> {
        pollster::block_on(Self::new_headless_async())
    }

    async fn new_headless_async() -> Result<Self, BridgeError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| BridgeError::NoAdapter)?;

        let adapter_name = adapter.get_info().name;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("planar-height-bridge"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let mut source = Self::from_device(device, queue);
        source.adapter_name = adapter_name;
        Ok(source)
    }

    /// Create a source sharing an existing renderer's device and queue.
    pub fn from_device(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("height-window-shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(compute_shader_source())),
        });

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("height-window-bgl"),
            entries: &[
                uniform_entry(0),
                uniform_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("height-window-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("height-window-pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("cs_height_window"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        let terrain_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("height-window-terrain"),
            contents: bytemuck::bytes_of(&TerrainUniform::from_params(&TerrainParameters::default())),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let window_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("height-window-placement"),
            contents: bytemuck::bytes_of(&WindowUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
            terrain_buffer,
            window_buffer,
            output: None,
            adapter_name: String::from("shared"),
        }
    }

    /// Name of the adapter the source runs on.
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    fn ensure_output(&mut self, size: u64) {
        let too_small = self.output.as_ref().is_none_or(|o| o.capacity < size);
        if too_small {
            let storage = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("height-window-storage"),
                size,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            });
            let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("height-window-staging"),
                size,
                usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.output = Some(OutputBuffers {
                storage,
                staging,
                capacity: size,
            });
        }
    }
}

impl HeightSource for GpuHeightSource {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn render_window(
        &mut self,
        params: &TerrainParameters,
        window: &WindowSpec,
        out: &mut Vec<f32>,
    ) -> Result<(), BridgeError> {
        let expected = window.node_count();
        let size = (expected * std::mem::size_of::<f32>()) as u64;
        let limits = self.device.limits();
        let limit = u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size);
        if size > limit
            || window.resolution.div_ceil(WORKGROUP_SIZE) > limits.max_compute_workgroups_per_dimension
        {
            return Err(BridgeError::WindowTooLarge {
                resolution: window.resolution,
                bytes: size,
                limit,
            });
        }

        self.queue.write_buffer(
            &self.terrain_buffer,
            0,
            bytemuck::bytes_of(&TerrainUniform::from_params(params)),
        );
        self.queue.write_buffer(
            &self.window_buffer,
            0,
            bytemuck::bytes_of(&WindowUniform::from(window)),
        );

        self.ensure_output(size);
        let Some(output) = self.output.as_ref() else {
            return Err(BridgeError::SizeMismatch {
                expected,
                actual: 0,
            });
        };

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("height-window-bind-group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.terrain_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: self.window_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: output.storage.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("height-window-encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("height-window-pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            let groups = window.resolution.div_ceil(WORKGROUP_SIZE);
            pass.dispatch_workgroups(groups, groups, 1);
        }
        encoder.copy_buffer_to_buffer(&output.storage, 0, &output.staging, 0, size);
        self.queue.submit(Some(encoder.finish()));

        let slice = output.staging.slice(..size);
        let (tx, rx) = crossbeam_channel::bounded(1);
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        })?;
        rx.recv().map_err(|_| BridgeError::ChannelClosed)??;

        {
            let mapped = slice.get_mapped_range();
            out.clear();
            out.extend(bytemuck::pod_collect_to_vec::<u8, f32>(&mapped));
        }
        output.staging.unmap();

        if out.len() != expected {
            return Err(BridgeError::SizeMismatch {
                expected,
                actual: out.len(),
            });
        }
        tracing::trace!(nodes = expected, "gpu height window read back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_uniform_layout() {
        assert_eq!(std::mem::size_of::<WindowUniform>(), 16);
        let window = WindowSpec::centered([10.0, 20.0], 100.0, 11);
        let u = WindowUniform::from(&window);
        assert_eq!(u.origin, [-40.0, -30.0]);
        assert_eq!(u.spacing, 10.0);
        assert_eq!(u.resolution, 11);
    }

    #[test]
    fn test_compute_source_contains_both_parts() {
        let src = compute_shader_source();
        assert!(src.contains("fn terrain_height("));
        assert!(src.contains("fn cs_height_window("));
        assert!(src.contains("@workgroup_size(8, 8)"));
    }
}

//! Facade tying the sampler to the floating-origin wrapper.
//!
//! Consumers hold local positions; the terrain converts them to true world
//! coordinates before every evaluation so what they see never depends on
//! where the rover happens to be.

use glam::Vec3;
use planar_config::{BiomePreset, Config};
use planar_terrain::{
    BiomeBlend, TerrainParameters, TerrainUniform, default_biomes, karst_biome,
};

use crate::bridge::{HeightSource, compute_shader_source};
use crate::origin::{CoordinateWrapper, WrapWindow};
use crate::sampler::{CenterUpdate, HeightFieldSampler, SamplerConfig, SamplerStats};

/// Everything a renderer needs to draw the same surface on the GPU.
#[derive(Clone, Debug)]
pub struct TerrainDescriptor {
    /// Parameters as supplied.
    pub params: TerrainParameters,
    /// Packed uniform for `@group(0) @binding(0)`.
    pub uniform: TerrainUniform,
    /// WGSL module containing `terrain_height` and the window compute entry.
    pub shader_source: String,
}

/// Ground under a consumer placed at a local position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundPlacement {
    /// Local position with `y` on the surface.
    pub local: Vec3,
    /// World Z the local position corresponds to.
    pub world_z: f64,
}

/// Height sampler plus floating-origin wrapper, driven once per frame.
pub struct PlanarTerrain {
    sampler: HeightFieldSampler,
    wrapper: CoordinateWrapper,
}

impl PlanarTerrain {
    /// Create a terrain with no source attached.
    pub fn create(params: TerrainParameters, sampler: SamplerConfig, wrap: WrapWindow) -> Self {
        if let Err(err) = params.validate() {
            tracing::warn!(%err, "terrain parameters out of range, evaluators will sanitize");
        }
        Self {
            sampler: HeightFieldSampler::new(params, sampler),
            wrapper: CoordinateWrapper::new(wrap),
        }
    }

    /// Build parameters and windows from a loaded config.
    pub fn from_config(config: &Config) -> Self {
        Self::create(
            params_from_config(config),
            SamplerConfig {
                world_size: config.sampler.world_size,
                resolution: config.sampler.resolution,
                recenter_fraction: config.sampler.recenter_fraction,
            },
            WrapWindow::new(config.wrap.range),
        )
    }

    pub fn descriptor(&self) -> TerrainDescriptor {
        let params = self.sampler.params().clone();
        TerrainDescriptor {
            uniform: TerrainUniform::from_params(&params),
            params,
            shader_source: compute_shader_source(),
        }
    }

    /// Attach the window source used by the sampler.
    pub fn attach_source(&mut self, source: Box<dyn HeightSource>) {
        self.sampler.attach_source(source);
    }

    pub fn sampler(&self) -> &HeightFieldSampler {
        &self.sampler
    }

    pub fn wrapper(&self) -> &CoordinateWrapper {
        &self.wrapper
    }

    /// Move the rover forward by `dz` and recenter the sampler on the viewer.
    pub fn advance(&mut self, dz: f32, viewer_x: f32) -> CenterUpdate {
        self.wrapper.advance(dz);
        self.sampler
            .update_center(viewer_x, self.wrapper.rover_z() as f32)
    }

    /// Recenter the sampler on an explicit world position.
    pub fn update_center(&mut self, x: f32, z: f32) -> CenterUpdate {
        self.sampler.update_center(x, z)
    }

    /// Height at a world position.
    pub fn get_height(&self, x: f32, z: f32) -> f32 {
        self.sampler.get_height(x, z)
    }

    pub fn get_heights(&self, points: &[(f32, f32)]) -> Vec<f32> {
        self.sampler.get_heights(points)
    }

    /// Continuous biome value at a world position.
    pub fn get_biome_at(&self, x: f32, z: f32) -> f32 {
        self.sampler.get_biome_at(x, z)
    }

    pub fn classify(&self, x: f32, z: f32) -> BiomeBlend {
        self.sampler.classify(x, z)
    }

    /// Local Z for a world Z.
    pub fn wrap_z(&self, world_z: f64) -> f32 {
        self.wrapper.wrap_z(world_z)
    }

    /// World Z for a local Z.
    pub fn to_world_z(&self, local_z: f32) -> f64 {
        self.wrapper.to_world(local_z)
    }

    pub fn rover_z(&self) -> f64 {
        self.wrapper.rover_z()
    }

    /// Snap a consumer at local `(x, z)` onto the surface.
    pub fn ground_at_local(&self, local_x: f32, local_z: f32) -> GroundPlacement {
        let world_z = self.wrapper.to_world(local_z);
        let y = self.sampler.get_height(local_x, world_z as f32);
        GroundPlacement {
            local: Vec3::new(local_x, y, local_z),
            world_z,
        }
    }

    /// Ground placements for a batch of local positions.
    pub fn ground_batch(&self, locals: &[(f32, f32)]) -> Vec<GroundPlacement> {
        let world: Vec<(f64, (f32, f32))> = locals
            .iter()
            .map(|&(x, z)| {
                let wz = self.wrapper.to_world(z);
                (wz, (x, wz as f32))
            })
            .collect();
        let points: Vec<(f32, f32)> = world.iter().map(|&(_, p)| p).collect();
        let heights = self.sampler.get_heights(&points);
        locals
            .iter()
            .zip(world)
            .zip(heights)
            .map(|((&(x, z), (world_z, _)), y)| GroundPlacement {
                local: Vec3::new(x, y, z),
                world_z,
            })
            .collect()
    }

    /// Update amplitude and frequency from a UI or config reload.
    pub fn sync_terrain_params(&mut self, terrain_height: f32, terrain_scale: f32) {
        self.sampler.sync_terrain_params(terrain_height, terrain_scale);
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.sampler.set_seed(seed);
    }

    /// Replace the full parameter set.
    pub fn replace_params(&mut self, params: TerrainParameters) {
        self.sampler.set_params(params);
    }

    pub fn stats(&self) -> SamplerStats {
        self.sampler.stats()
    }
}

/// Terrain parameters described by a config file.
pub fn params_from_config(config: &Config) -> TerrainParameters {
    let t = &config.terrain;
    let mut biomes = default_biomes();
    if t.biomes == BiomePreset::WithKarst {
        biomes.push(karst_biome());
    }
    let mut params = TerrainParameters::with_seed(t.seed);
    params.terrain_scale = t.scale;
    params.terrain_height = t.height;
    params.biome_count = t.biome_count;
    params.biome_cycle_speed = t.cycle_speed;
    params.landform_blend = t.landform_blend;
    params.biomes = biomes;
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::CpuHeightSource;

    fn cpu_terrain() -> PlanarTerrain {
        let mut t = PlanarTerrain::create(
            TerrainParameters::default(),
            SamplerConfig {
                resolution: 32,
                ..Default::default()
            },
            WrapWindow::default(),
        );
        t.attach_source(Box::new(CpuHeightSource::new()));
        t
    }

    #[test]
    fn test_params_from_config() {
        let mut config = Config::default();
        config.terrain.seed = 5;
        config.terrain.biomes = BiomePreset::WithKarst;
        config.terrain.biome_count = 6;
        let params = params_from_config(&config);
        assert_eq!(params.seed(), 5);
        assert_eq!(params.biomes.len(), 6);
        assert_eq!(params.biomes[5], karst_biome());
        assert_eq!(params.biome_count, 6);
    }

    #[test]
    fn test_advance_moves_rover_and_window() {
        let mut t = cpu_terrain();
        assert_eq!(t.advance(0.0, 0.0), CenterUpdate::Recentered);
        assert_eq!(t.advance(10.0, 0.0), CenterUpdate::Unchanged);
        assert_eq!(t.rover_z(), 10.0);
        assert_eq!(t.advance(80.0, 0.0), CenterUpdate::Recentered);
        assert_eq!(t.sampler().cache().unwrap().center(), [0.0, 90.0]);
    }

    #[test]
    fn test_ground_depends_on_world_not_rover() {
        let mut t = cpu_terrain();
        t.advance(0.0, 0.0);
        let before = t.ground_at_local(3.0, 50.0);

        // Advance and re-place at the same world Z.
        t.advance(30.0, 0.0);
        let local_z = t.wrap_z(before.world_z);
        let after = t.ground_at_local(3.0, local_z);
        assert!((after.world_z - before.world_z).abs() < 1e-3);
        assert!((after.local.y - before.local.y).abs() < 1e-2);
    }

    #[test]
    fn test_ground_batch_matches_single() {
        let mut t = cpu_terrain();
        t.advance(0.0, 0.0);
        let locals = [(0.0, 0.0), (-20.0, 40.0), (75.0, -60.0)];
        let batch = t.ground_batch(&locals);
        for (p, &(x, z)) in batch.iter().zip(&locals) {
            assert_eq!(*p, t.ground_at_local(x, z));
        }
    }

    #[test]
    fn test_descriptor_tracks_params() {
        let mut t = cpu_terrain();
        t.sync_terrain_params(90.0, 0.001);
        let d = t.descriptor();
        assert_eq!(d.params.terrain_height, 90.0);
        assert_eq!(d.uniform.height, 90.0);
        assert_eq!(d.uniform.scale, 0.001);
        assert!(d.shader_source.contains("fn cs_height_window("));
    }

    #[test]
    fn test_without_source_heights_are_zero() {
        let t = PlanarTerrain::create(
            TerrainParameters::default(),
            SamplerConfig::default(),
            WrapWindow::default(),
        );
        assert_eq!(t.get_height(1.0, 2.0), 0.0);
        assert_eq!(t.ground_at_local(1.0, 2.0).local.y, 0.0);
    }
}

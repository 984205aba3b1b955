//! Headless flight: moves the rover, keeps the camera above ground and
//! drops a ring of ground instances that scroll with the floating origin.

use std::collections::BTreeMap;

use glam::Vec3;
use planar_config::FlightConfig;
use planar_flyover::{CenterUpdate, PlanarTerrain};
use planar_terrain::BiomeRegistry;
use tracing::{debug, info, warn};

/// Summary of a finished flight.
#[derive(Debug, Default)]
pub struct FlightReport {
    pub frames: u32,
    pub recenters: u32,
    pub min_clearance: f32,
    pub lowest_ground: f32,
    pub highest_ground: f32,
    /// Ground instances per biome name at the end of the flight.
    pub instances_per_biome: BTreeMap<String, usize>,
}

/// Ground instances kept at fixed world positions around the viewer.
struct GroundRing {
    /// `(local_x, world_z)` per instance.
    anchors: Vec<(f32, f64)>,
    positions: Vec<Vec3>,
}

impl GroundRing {
    fn new(count: u32, radius: f32) -> Self {
        // Golden-angle spiral fills the disc evenly.
        let golden = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
        let anchors = (0..count)
            .map(|i| {
                let r = radius * ((i as f32 + 0.5) / count.max(1) as f32).sqrt();
                let a = i as f32 * golden;
                (r * a.cos(), f64::from(r * a.sin()))
            })
            .collect();
        Self {
            anchors,
            positions: Vec::new(),
        }
    }

    fn place(&mut self, terrain: &PlanarTerrain) {
        let locals: Vec<(f32, f32)> = self
            .anchors
            .iter()
            .map(|&(x, world_z)| (x, terrain.wrap_z(world_z)))
            .collect();
        self.positions = terrain
            .ground_batch(&locals)
            .into_iter()
            .map(|p| p.local)
            .collect();
    }
}

/// Fly `config.frames` frames straight along +Z.
pub fn fly(terrain: &mut PlanarTerrain, config: &FlightConfig) -> FlightReport {
    let half_range = terrain.wrapper().window().half_range();
    let mut ring = GroundRing::new(config.ground_instances, half_range * 0.9);
    let mut report = FlightReport {
        min_clearance: f32::INFINITY,
        lowest_ground: f32::INFINITY,
        highest_ground: f32::NEG_INFINITY,
        ..Default::default()
    };

    let mut camera_y = 0.0f32;
    for frame in 0..config.frames {
        if terrain.advance(config.speed, 0.0) == CenterUpdate::Recentered {
            report.recenters += 1;
            ring.place(terrain);
            debug!(frame, rover_z = terrain.rover_z(), "window recentered");
        }

        let ground = terrain.ground_at_local(0.0, 0.0).local.y;
        let target = ground + config.camera_clearance;
        // Rise instantly, sink slowly.
        camera_y = if target > camera_y {
            target
        } else {
            camera_y + (target - camera_y) * 0.1
        };

        report.min_clearance = report.min_clearance.min(camera_y - ground);
        report.lowest_ground = report.lowest_ground.min(ground);
        report.highest_ground = report.highest_ground.max(ground);
        report.frames += 1;
    }

    ring.place(terrain);
    if let Some(p) = ring.positions.first() {
        debug!(x = p.x, y = p.y, z = p.z, "first ground instance");
    }
    match BiomeRegistry::from_definitions(&terrain.descriptor().params.biomes) {
        Ok(registry) => {
            for p in &ring.positions {
                let world_z = terrain.to_world_z(p.z) as f32;
                let id = terrain.classify(p.x, world_z).biome_id;
                if let Some(def) = registry.get(id) {
                    *report.instances_per_biome.entry(def.name.clone()).or_default() += 1;
                }
            }
        }
        Err(e) => warn!("biome list unusable for instance tally: {e}"),
    }
    info!(
        instances = ring.positions.len(),
        rover_z = terrain.rover_z(),
        "flight finished"
    );
    report
}

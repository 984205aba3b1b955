//! Headless flyover over the planar terrain.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p planar-demo -- --frames 1200 --gpu false`.

mod flight;

use std::path::{Path, PathBuf};

use clap::Parser;
use planar_config::{CliArgs, Config, default_config_dir};
use planar_flyover::{CpuHeightSource, GpuHeightSource, PlanarTerrain};
use planar_terrain::{
    DebugImage, HeightFieldComposer, TerrainDebugState, WorldRegion, base_noise_layer,
    render_biome_debug, render_heightmap_debug, render_noise_debug,
};
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
enum DumpError {
    #[error("failed to create output directory: {0}")]
    CreateDir(#[from] std::io::Error),
    #[error("debug image has inconsistent size")]
    BadImage,
    #[error("failed to write image: {0}")]
    Write(#[from] image::ImageError),
}

fn attach_source(terrain: &mut PlanarTerrain, use_gpu: bool) {
    if use_gpu {
        match GpuHeightSource::new_headless() {
            Ok(gpu) => {
                info!(adapter = gpu.adapter_name(), "GPU height source ready");
                terrain.attach_source(Box::new(gpu));
                return;
            }
            Err(e) => warn!("GPU height source unavailable ({e}), using CPU"),
        }
    }
    terrain.attach_source(Box::new(CpuHeightSource::new()));
}

fn save_png(image: DebugImage, path: &Path) -> Result<(), DumpError> {
    let rgba = image::RgbaImage::from_raw(image.width, image.height, image.pixels)
        .ok_or(DumpError::BadImage)?;
    rgba.save(path)?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Outline the sampler's cached window on a top-down image of `region`.
fn draw_sampler_window(image: &mut DebugImage, terrain: &PlanarTerrain, region: WorldRegion) {
    let Some(cache) = terrain.sampler().cache() else {
        return;
    };
    let window = cache.window();
    let (min_x, min_z, max_x, max_z) = region;
    let (w, h) = image.dimensions();
    let to_px = |x: f32, z: f32| {
        let px = (x - min_x) / (max_x - min_x) * w as f32;
        let py = (z - min_z) / (max_z - min_z) * h as f32;
        (px.max(0.0) as u32, py.max(0.0) as u32)
    };
    let [ox, oz] = window.origin;
    image.outline_rect(
        to_px(ox, oz),
        to_px(ox + window.extent(), oz + window.extent()),
        (255, 0, 255),
    );
}

fn dump_images(
    terrain: &PlanarTerrain,
    state: &mut TerrainDebugState,
    config: &Config,
    output: &Path,
) -> Result<(), DumpError> {
    let generation = terrain.sampler().generation();
    if !state.needs_render(generation) {
        return Ok(());
    }
    std::fs::create_dir_all(output)?;
    let composer = HeightFieldComposer::new(terrain.descriptor().params);
    let size = config.debug.image_size.max(1);
    let half = config.debug.image_extent * 0.5;
    let z = terrain.rover_z() as f32;
    let region = (-half, z - half, half, z + half);

    if state.show_heightmap {
        let mut image = render_heightmap_debug(&composer, size, size, region);
        if state.show_sampler_window {
            draw_sampler_window(&mut image, terrain, region);
        }
        save_png(image, &output.join("heightmap.png"))?;

        let params = composer.params();
        let layer = base_noise_layer(params.terrain_scale, params.seed_offset());
        save_png(
            render_noise_debug(&layer, size, size, region),
            &output.join("noise.png"),
        )?;
    }
    if state.show_biome_map {
        save_png(
            render_biome_debug(&composer, size, size, region),
            &output.join("biomes.png"),
        )?;
    }
    state.mark_rendered(generation);
    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let output = args.output.clone().unwrap_or_else(|| PathBuf::from("planar-out"));
    let log_dir = output.join("logs");
    planar_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let mut terrain = PlanarTerrain::from_config(&config);
    attach_source(&mut terrain, config.sampler.use_gpu);
    info!(
        seed = config.terrain.seed,
        source = terrain.sampler().source_name().unwrap_or("none"),
        "Starting flight"
    );

    let report = flight::fly(&mut terrain, &config.flight);
    let stats = terrain.stats();
    info!(
        frames = report.frames,
        recenters = report.recenters,
        min_clearance = report.min_clearance,
        ground_min = report.lowest_ground,
        ground_max = report.highest_ground,
        "Flight report"
    );
    for (biome, count) in &report.instances_per_biome {
        info!(biome = biome.as_str(), count, "Ground instances");
    }
    info!(
        cached = stats.cached_hits,
        direct = stats.direct_fallbacks,
        failures = stats.source_failures,
        "Sampler stats"
    );

    let mut debug_state = if config.debug.dump_images {
        TerrainDebugState::all()
    } else {
        TerrainDebugState::new()
    };
    if let Err(e) = dump_images(&terrain, &mut debug_state, &config, &output) {
        error!("Failed to write debug images: {e}");
    }
}

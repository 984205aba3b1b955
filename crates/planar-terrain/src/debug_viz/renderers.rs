//! Terrain debug visualization renderers: heightmap, biome map and raw noise.

use noise::NoiseFn;

use super::image::DebugImage;
use crate::biome::surface_color;
use crate::composer::HeightFieldComposer;

/// World-space rectangle `(min_x, min_z, max_x, max_z)`.
pub type WorldRegion = (f32, f32, f32, f32);

/// Lowest height the heightmap colour ramp resolves, as a multiple of `terrain_height`.
const RAMP_MIN: f32 = -1.0;
/// Highest height the ramp resolves, as a multiple of `terrain_height`.
const RAMP_MAX: f32 = 1.25;

fn pixel_to_world(region: WorldRegion, px: u32, py: u32, width: u32, height: u32) -> (f32, f32) {
    let x = region.0 + (px as f32 / width as f32) * (region.2 - region.0);
    let z = region.1 + (py as f32 / height as f32) * (region.3 - region.1);
    (x, z)
}

/// Generate a colour-coded heightmap of a world region.
///
/// Image rows run along +Z. Heights are mapped onto
/// `[RAMP_MIN, RAMP_MAX] * terrain_height` with zero as the water line.
pub fn render_heightmap_debug(
    composer: &HeightFieldComposer,
    width: u32,
    height: u32,
    region: WorldRegion,
) -> DebugImage {
    let mut image = DebugImage::new(width, height);
    let amp = composer.params().terrain_height.abs().max(f32::EPSILON);
    let lo = RAMP_MIN * amp;
    let hi = RAMP_MAX * amp;
    let sea_level = -lo / (hi - lo);

    for py in 0..height {
        for px in 0..width {
            let (x, z) = pixel_to_world(region, px, py, width, height);
            let h = composer.height(x, z);
            let normalized = ((h - lo) / (hi - lo)).clamp(0.0, 1.0);
            image.set_rgb(px, py, height_to_color(normalized, sea_level));
        }
    }

    image
}

/// Map a normalized height `[0, 1]` to an RGB color.
///
/// Color bands: deep water → shallow water → shore → lowland → highland → peaks.
pub fn height_to_color(normalized: f32, sea_level: f32) -> (u8, u8, u8) {
    if normalized < sea_level * 0.5 {
        (0, 0, 128)
    } else if normalized < sea_level {
        (30, 80, 200)
    } else if normalized < sea_level + 0.02 {
        (220, 200, 130)
    } else if normalized < 0.7 {
        let t = ((normalized - sea_level) / (0.7 - sea_level)).clamp(0.0, 1.0);
        (
            (30.0 + t * 80.0) as u8,
            (160.0 - t * 40.0) as u8,
            (30.0 + t * 20.0) as u8,
        )
    } else if normalized < 0.88 {
        let t = (normalized - 0.7) / 0.18;
        (
            (110.0 + t * 40.0) as u8,
            (120.0 - t * 50.0) as u8,
            (50.0 + t * 20.0) as u8,
        )
    } else {
        let t = ((normalized - 0.88) / 0.12).min(1.0);
        let base = 150.0 + t * 105.0;
        (base as u8, base as u8, base as u8)
    }
}

/// Generate a biome map of a world region using the ground colour ramp at
/// mid elevation, so biome bands and their cross-fades are visible.
pub fn render_biome_debug(
    composer: &HeightFieldComposer,
    width: u32,
    height: u32,
    region: WorldRegion,
) -> DebugImage {
    let mut image = DebugImage::new(width, height);
    let params = composer.params();

    for py in 0..height {
        for px in 0..width {
            let (x, z) = pixel_to_world(region, px, py, width, height);
            let blend = composer.classify(x, z);
            let rgb = surface_color(&params.biomes, params.biome_count, blend, 0.5);
            image.set_rgb(px, py, to_u8(rgb));
        }
    }

    image
}

/// Grayscale image of any 2D noise source over a world region, mapping
/// `[-1, 1]` to black..white.
pub fn render_noise_debug(
    source: &impl NoiseFn<f64, 2>,
    width: u32,
    height: u32,
    region: WorldRegion,
) -> DebugImage {
    let mut image = DebugImage::new(width, height);
    for py in 0..height {
        for px in 0..width {
            let (x, z) = pixel_to_world(region, px, py, width, height);
            let n = source.get([f64::from(x), f64::from(z)]);
            let v = ((n * 0.5 + 0.5).clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
            image.set_rgb(px, py, (v, v, v));
        }
    }
    image
}

fn to_u8(rgb: [f32; 3]) -> (u8, u8, u8) {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
    (c(rgb[0]), c(rgb[1]), c(rgb[2]))
}

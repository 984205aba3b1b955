//! Ground colour from the biome cycle.
//!
//! Colours cross-fade across the whole biome cell, so unlike landforms they
//! have no seam at biome boundaries.

use super::{BiomeBlend, BiomeDefinition, Rgb};

fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Low → mid → high ramp of a single biome at `elevation` in `[0, 1]`.
pub fn elevation_color(def: &BiomeDefinition, elevation: f32) -> Rgb {
    let e = elevation.clamp(0.0, 1.0);
    if e < 0.5 {
        lerp(def.low_color, def.mid_color, e * 2.0)
    } else {
        lerp(def.mid_color, def.high_color, (e - 0.5) * 2.0)
    }
}

/// Ground colour at a classified position.
///
/// Within slot `id` the colour moves from the biome's own ramp towards the
/// ramp of slot `id + 1` (wrapping), reaching it exactly at the boundary.
/// Returns mid grey when `biomes` is empty.
pub fn surface_color(
    biomes: &[BiomeDefinition],
    biome_count: u32,
    blend: BiomeBlend,
    elevation: f32,
) -> Rgb {
    if biomes.is_empty() {
        return [0.5, 0.5, 0.5];
    }
    let count = biome_count.max(1);
    let id = blend.biome_id.0;
    let current = &biomes[id as usize % biomes.len()];
    let next = &biomes[((id + 1) % count) as usize % biomes.len()];
    let t = blend.cell_fraction(count);
    lerp(
        elevation_color(current, elevation),
        elevation_color(next, elevation),
        t,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{BiomeId, default_biomes};

    #[test]
    fn test_elevation_ramp_endpoints() {
        let def = &default_biomes()[0];
        assert_eq!(elevation_color(def, 0.0), def.low_color);
        assert_eq!(elevation_color(def, 1.0), def.high_color);
        let mid = elevation_color(def, 0.5);
        for c in 0..3 {
            assert!((mid[c] - def.mid_color[c]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_color_continuous_across_biome_boundary() {
        let biomes = default_biomes();
        let count = 5;
        let before = BiomeBlend {
            blend: 0.4 - 1e-6,
            biome_id: BiomeId(1),
        };
        let after = BiomeBlend {
            blend: 0.4,
            biome_id: BiomeId(2),
        };
        let a = surface_color(&biomes, count, before, 0.3);
        let b = surface_color(&biomes, count, after, 0.3);
        for c in 0..3 {
            assert!((a[c] - b[c]).abs() < 1e-3, "channel {c}: {} vs {}", a[c], b[c]);
        }
    }

    #[test]
    fn test_color_continuous_across_cycle_wrap() {
        let biomes = default_biomes();
        let last = BiomeBlend {
            blend: 1.0 - 1e-6,
            biome_id: BiomeId(4),
        };
        let first = BiomeBlend {
            blend: 0.0,
            biome_id: BiomeId(0),
        };
        let a = surface_color(&biomes, 5, last, 0.7);
        let b = surface_color(&biomes, 5, first, 0.7);
        for c in 0..3 {
            assert!((a[c] - b[c]).abs() < 1e-3);
        }
    }

    #[test]
    fn test_empty_palette_is_grey() {
        let blend = BiomeBlend {
            blend: 0.3,
            biome_id: BiomeId(1),
        };
        assert_eq!(surface_color(&[], 3, blend, 0.5), [0.5, 0.5, 0.5]);
    }
}

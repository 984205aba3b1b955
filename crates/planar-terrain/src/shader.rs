//! GPU evaluator: WGSL source for the height function and its uniform layout.
//!
//! The WGSL below is a line-for-line counterpart of [`crate::noise_kernel`],
//! [`crate::fractal`], [`crate::biome::BiomeClassifier`] and
//! [`crate::composer`]. Keep the literals textually identical to the Rust
//! constants and keep the operation order; `fract`, `round` and `smoothstep`
//! are spelled out instead of using WGSL builtins whose edge behaviour is
//! implementation-defined.
//!
//! Pipelines including this source must bind [`TerrainUniform`] at
//! `@group(0) @binding(0)`.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use crate::params::{MAX_BIOMES, TerrainParameters};

/// Uniform block mirrored by `struct TerrainUniform` in WGSL (288 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainUniform {
    pub scale: f32,
    pub height: f32,
    pub biome_count: u32,
    pub cycle_speed: f32,
    pub seed_offset: [f32; 2],
    pub landform_blend: f32,
    pub landform_count: u32,
    /// `(kind, a, b, 0)` per biome slot, see [`crate::biome::Landform::to_row`].
    pub landforms: [[f32; 4]; MAX_BIOMES as usize],
}

const_assert_eq!(std::mem::size_of::<TerrainUniform>(), 288);

impl TerrainUniform {
    /// Pack parameters for upload. Parameters are sanitized first, exactly as
    /// [`crate::HeightFieldComposer::new`] does, so both paths see the same values.
    pub fn from_params(params: &TerrainParameters) -> Self {
        let params = params.sanitized();
        let mut landforms = [[0.0; 4]; MAX_BIOMES as usize];
        for (row, biome) in landforms.iter_mut().zip(&params.biomes) {
            *row = biome.landform.to_row();
        }
        Self {
            scale: params.terrain_scale,
            height: params.terrain_height,
            biome_count: params.biome_count,
            cycle_speed: params.biome_cycle_speed,
            seed_offset: params.seed_offset(),
            landform_blend: params.landform_blend,
            landform_count: params.biomes.len() as u32,
            landforms,
        }
    }
}

/// WGSL height function library.
///
/// Exposes `terrain_height(world_x, world_z) -> f32` and
/// `terrain_biome_blend(world_x, world_z) -> f32`.
pub const TERRAIN_HEIGHT_WGSL: &str = r#"
struct TerrainUniform {
    scale: f32,
    height: f32,
    biome_count: u32,
    cycle_speed: f32,
    seed_offset: vec2<f32>,
    landform_blend: f32,
    landform_count: u32,
    landforms: array<vec4<f32>, 16>,
};

@group(0) @binding(0) var<uniform> terrain: TerrainUniform;

const SIMPLEX_C: vec4<f32> = vec4<f32>(0.21132487, 0.3660254, -0.57735026, 0.024390243);
const TAU: f32 = 6.2831855;

fn fract_f(v: f32) -> f32 {
    return v - floor(v);
}

fn mod289(v: f32) -> f32 {
    return v - floor(v * (1.0 / 289.0)) * 289.0;
}

fn permute(v: f32) -> f32 {
    return mod289((v * 34.0 + 1.0) * v);
}

fn smooth_step(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = clamp((x - edge0) / (edge1 - edge0), 0.0, 1.0);
    return t * t * (3.0 - 2.0 * t);
}

fn noise2d(x: f32, y: f32) -> f32 {
    let c = SIMPLEX_C;

    let skew = (x + y) * c.y;
    var ix = floor(x + skew);
    var iy = floor(y + skew);
    let unskew = (ix + iy) * c.x;
    let x0x = x - ix + unskew;
    let x0y = y - iy + unskew;

    var i1x = 0.0;
    var i1y = 1.0;
    if (x0x > x0y) {
        i1x = 1.0;
        i1y = 0.0;
    }

    let x1x = x0x + c.x - i1x;
    let x1y = x0y + c.x - i1y;
    let x2x = x0x + c.z;
    let x2y = x0y + c.z;

    ix = mod289(ix);
    iy = mod289(iy);
    let p0 = permute(permute(iy) + ix);
    let p1 = permute(permute(iy + i1y) + ix + i1x);
    let p2 = permute(permute(iy + 1.0) + ix + 1.0);

    var m0 = max(0.5 - (x0x * x0x + x0y * x0y), 0.0);
    var m1 = max(0.5 - (x1x * x1x + x1y * x1y), 0.0);
    var m2 = max(0.5 - (x2x * x2x + x2y * x2y), 0.0);
    m0 = m0 * m0;
    m1 = m1 * m1;
    m2 = m2 * m2;
    m0 = m0 * m0;
    m1 = m1 * m1;
    m2 = m2 * m2;

    let gx0 = 2.0 * fract_f(p0 * c.w) - 1.0;
    let gx1 = 2.0 * fract_f(p1 * c.w) - 1.0;
    let gx2 = 2.0 * fract_f(p2 * c.w) - 1.0;
    let h0 = abs(gx0) - 0.5;
    let h1 = abs(gx1) - 0.5;
    let h2 = abs(gx2) - 0.5;
    let a0 = gx0 - floor(gx0 + 0.5);
    let a1 = gx1 - floor(gx1 + 0.5);
    let a2 = gx2 - floor(gx2 + 0.5);

    m0 = m0 * (1.7928429 - 0.8537347 * (a0 * a0 + h0 * h0));
    m1 = m1 * (1.7928429 - 0.8537347 * (a1 * a1 + h1 * h1));
    m2 = m2 * (1.7928429 - 0.8537347 * (a2 * a2 + h2 * h2));

    let g0 = a0 * x0x + h0 * x0y;
    let g1 = a1 * x1x + h1 * x1y;
    let g2 = a2 * x2x + h2 * x2y;

    return 130.0 * (m0 * g0 + m1 * g1 + m2 * g2);
}

fn fbm(x: f32, y: f32, octaves: u32) -> f32 {
    var value = 0.0;
    var total = 0.0;
    var amplitude = 0.5;
    var frequency = 1.0;
    for (var i = 0u; i < octaves; i = i + 1u) {
        value = value + amplitude * noise2d(x * frequency, y * frequency);
        total = total + amplitude;
        amplitude = amplitude * 0.5;
        frequency = frequency * 2.0;
    }
    if (total > 0.0) {
        return value / total;
    }
    return 0.0;
}

fn ridged_fbm(x: f32, y: f32, octaves: u32) -> f32 {
    var value = 0.0;
    var total = 0.0;
    var amplitude = 0.5;
    var frequency = 1.0;
    for (var i = 0u; i < octaves; i = i + 1u) {
        let ridge = 1.0 - abs(noise2d(x * frequency, y * frequency));
        value = value + amplitude * (ridge * ridge);
        total = total + amplitude;
        amplitude = amplitude * 0.5;
        frequency = frequency * 2.0;
    }
    if (total > 0.0) {
        return value / total;
    }
    return 0.0;
}

struct BiomeSample {
    blend: f32,
    id: u32,
};

fn classify_shifted(x: f32, z: f32) -> BiomeSample {
    let x_variation = 0.08 * noise2d(x * 0.00035 + 3.1, 7.9);
    let local = 0.015 * noise2d(x * 0.004, z * 0.004);
    var blend = fract_f(z * terrain.cycle_speed + x_variation + local);
    if (blend >= 1.0) {
        blend = 0.0;
    }
    let count = max(terrain.biome_count, 1u);
    let id = min(u32(blend * f32(count)), count - 1u);
    return BiomeSample(blend, id);
}

fn terrain_biome_blend(world_x: f32, world_z: f32) -> f32 {
    let sx = world_x + terrain.seed_offset.x;
    let sz = world_z + terrain.seed_offset.y;
    return classify_shifted(sx, sz).blend;
}

fn landform_row(id: u32) -> vec4<f32> {
    if (terrain.landform_count == 0u) {
        return vec4<f32>(0.0, 0.0, 0.0, 0.0);
    }
    return terrain.landforms[id % terrain.landform_count];
}

fn apply_landform(row: vec4<f32>, h: f32, px: f32, pz: f32) -> f32 {
    let s = terrain.scale;
    let amp = terrain.height;
    var out = h;
    switch u32(row.x) {
        case 1u: {
            out = h * row.y;
        }
        case 2u: {
            out = floor(h / row.y + 0.5) * row.y;
        }
        case 3u: {
            let f = s * 1.5;
            let c = abs(noise2d(px * f + 7.7, pz * f + 3.1));
            if (c < row.y) {
                let t = 1.0 - c / row.y;
                out = h - row.z * amp * t * t;
            }
        }
        case 4u: {
            let rx = sin(TAU * fract_f(px / row.z));
            let rz = sin(TAU * fract_f(pz / row.z));
            out = h + row.y * amp * rx * rz;
        }
        case 5u: {
            let f = s * 4.0;
            let k = noise2d(px * f + 19.9, pz * f + 63.1);
            if (k > row.y) {
                let t = (k - row.y) / (1.0 - row.y);
                out = h - row.z * amp * t * t;
            }
        }
        default: {}
    }
    return out;
}

fn terrain_height(world_x: f32, world_z: f32) -> f32 {
    let s = terrain.scale;
    let amp = terrain.height;
    let sx = world_x + terrain.seed_offset.x;
    let sz = world_z + terrain.seed_offset.y;

    let ws = s * 0.4;
    let wx = 200.0 * fbm(sx * ws, sz * ws, 2u);
    let wz = 200.0 * fbm(sx * ws + 5.2, sz * ws + 1.3, 2u);
    let px = sx + wx;
    let pz = sz + wz;

    let f1 = s * 2.5;
    let f2 = s * 6.0;
    let base = amp * 0.7 * fbm(px * s, pz * s, 6u)
        + amp * 0.5 * fbm(px * f1, pz * f1, 4u)
        + amp * 0.15 * fbm(px * f2, pz * f2, 3u);

    let fr = s * 3.0;
    let ridges = amp * 0.35 * ridged_fbm(px * fr, pz * fr, 5u);

    let fu = s * 0.3;
    let undulation = amp * 0.25 * fbm(px * fu, pz * fu, 2u);

    var h = base + ridges + undulation;

    let fd = s * 0.8;
    let d = noise2d(px * fd + 31.7, pz * fd + 47.3);
    if (d < -0.6) {
        let t = (-0.6 - d) / 0.4;
        h = h - amp * 0.8 * t * t;
    }

    let c = noise2d(px * 0.00015 + 91.3, pz * 0.00015 + 12.9);
    if (c > 0.7) {
        let t = (c - 0.7) / 0.3;
        h = h - amp * 1.2 * t * t;
    }

    let biome = classify_shifted(sx, sz);
    let own = apply_landform(landform_row(biome.id), h, px, pz);

    let band = terrain.landform_blend;
    let count = max(terrain.biome_count, 1u);
    if (band <= 0.0 || count < 2u) {
        return own;
    }

    let f = biome.blend * f32(count) - f32(biome.id);
    if (f > 1.0 - band) {
        let other = apply_landform(landform_row((biome.id + 1u) % count), h, px, pz);
        let k = 0.5 * smooth_step(1.0 - band, 1.0, f);
        return own + (other - own) * k;
    }
    if (f < band) {
        let other = apply_landform(landform_row((biome.id + count - 1u) % count), h, px, pz);
        let k = 0.5 * (1.0 - smooth_step(0.0, band, f));
        return own + (other - own) * k;
    }
    return own;
}
"#;

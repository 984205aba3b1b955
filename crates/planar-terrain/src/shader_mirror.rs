//! CPU transliteration of [`crate::shader::TERRAIN_HEIGHT_WGSL`].
//!
//! Written in the shader's vector style and driven only by a
//! [`TerrainUniform`], so it exercises the uniform packing and the WGSL
//! formulas independently of [`crate::HeightFieldComposer`]. Used by the
//! CPU/GPU parity tests and on machines without an adapter.

use glam::{Vec2, Vec3, Vec4};

use crate::shader::TerrainUniform;

const C: Vec4 = Vec4::new(0.211_324_87, 0.366_025_4, -0.577_350_26, 0.024_390_243);

fn mod289(v: f32) -> f32 {
    v - (v * (1.0 / 289.0)).floor() * 289.0
}

fn mod289_3(v: Vec3) -> Vec3 {
    Vec3::new(mod289(v.x), mod289(v.y), mod289(v.z))
}

fn permute3(v: Vec3) -> Vec3 {
    mod289_3((v * 34.0 + Vec3::ONE) * v)
}

fn fract_f(v: f32) -> f32 {
    v - v.floor()
}

fn smooth_step(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Vector-form simplex noise, as the shader writes it.
pub fn noise2d(v: Vec2) -> f32 {
    let i = (v + Vec2::splat((v.x + v.y) * C.y)).floor();
    let x0 = v - i + Vec2::splat((i.x + i.y) * C.x);

    let i1 = if x0.x > x0.y {
        Vec2::new(1.0, 0.0)
    } else {
        Vec2::new(0.0, 1.0)
    };
    let x1 = x0 + Vec2::splat(C.x) - i1;
    let x2 = x0 + Vec2::splat(C.z);

    let i = Vec2::new(mod289(i.x), mod289(i.y));
    let p = permute3(
        permute3(Vec3::splat(i.y) + Vec3::new(0.0, i1.y, 1.0))
            + Vec3::splat(i.x)
            + Vec3::new(0.0, i1.x, 1.0),
    );

    let mut m = (Vec3::splat(0.5) - Vec3::new(x0.dot(x0), x1.dot(x1), x2.dot(x2))).max(Vec3::ZERO);
    m *= m;
    m *= m;

    let scaled = p * C.w;
    let x = 2.0 * (scaled - scaled.floor()) - Vec3::ONE;
    let h = x.abs() - Vec3::splat(0.5);
    let a0 = x - (x + Vec3::splat(0.5)).floor();

    m *= Vec3::splat(1.792_842_9) - 0.853_734_7 * (a0 * a0 + h * h);

    let g = Vec3::new(
        a0.x * x0.x + h.x * x0.y,
        a0.y * x1.x + h.y * x1.y,
        a0.z * x2.x + h.z * x2.y,
    );
    130.0 * m.dot(g)
}

fn fbm(p: Vec2, octaves: u32) -> f32 {
    let (mut value, mut total, mut amplitude, mut frequency) = (0.0, 0.0, 0.5, 1.0);
    for _ in 0..octaves {
        value += amplitude * noise2d(p * frequency);
        total += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }
    if total > 0.0 { value / total } else { 0.0 }
}

fn ridged_fbm(p: Vec2, octaves: u32) -> f32 {
    let (mut value, mut total, mut amplitude, mut frequency) = (0.0, 0.0, 0.5, 1.0);
    for _ in 0..octaves {
        let ridge = 1.0 - noise2d(p * frequency).abs();
        value += amplitude * (ridge * ridge);
        total += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }
    if total > 0.0 { value / total } else { 0.0 }
}

/// `(blend, id)` for a seed-shifted position.
fn classify_shifted(u: &TerrainUniform, s: Vec2) -> (f32, u32) {
    let x_variation = 0.08 * noise2d(Vec2::new(s.x * 0.00035 + 3.1, 7.9));
    let local = 0.015 * noise2d(s * 0.004);
    let mut blend = fract_f(s.y * u.cycle_speed + x_variation + local);
    if blend >= 1.0 {
        blend = 0.0;
    }
    let count = u.biome_count.max(1);
    let id = ((blend * count as f32) as u32).min(count - 1);
    (blend, id)
}

/// Shader-side biome blend at a world position.
pub fn biome_blend(u: &TerrainUniform, world_x: f32, world_z: f32) -> f32 {
    let s = Vec2::new(world_x, world_z) + Vec2::from_array(u.seed_offset);
    classify_shifted(u, s).0
}

fn landform_row(u: &TerrainUniform, id: u32) -> Vec4 {
    if u.landform_count == 0 {
        return Vec4::ZERO;
    }
    Vec4::from_array(u.landforms[(id % u.landform_count) as usize])
}

fn apply_landform(u: &TerrainUniform, row: Vec4, h: f32, p: Vec2) -> f32 {
    let s = u.scale;
    let amp = u.height;
    match row.x as u32 {
        1 => h * row.y,
        2 => (h / row.y + 0.5).floor() * row.y,
        3 => {
            let c = noise2d(p * (s * 1.5) + Vec2::new(7.7, 3.1)).abs();
            if c < row.y {
                let t = 1.0 - c / row.y;
                h - row.z * amp * t * t
            } else {
                h
            }
        }
        4 => {
            let tau = std::f32::consts::TAU;
            let rx = (tau * fract_f(p.x / row.z)).sin();
            let rz = (tau * fract_f(p.y / row.z)).sin();
            h + row.y * amp * rx * rz
        }
        5 => {
            let k = noise2d(p * (s * 4.0) + Vec2::new(19.9, 63.1));
            if k > row.y {
                let t = (k - row.y) / (1.0 - row.y);
                h - row.z * amp * t * t
            } else {
                h
            }
        }
        _ => h,
    }
}

/// Shader-side `terrain_height` at a world position.
pub fn terrain_height(u: &TerrainUniform, world_x: f32, world_z: f32) -> f32 {
    let s = u.scale;
    let amp = u.height;
    let shifted = Vec2::new(world_x, world_z) + Vec2::from_array(u.seed_offset);

    let ws = shifted * (s * 0.4);
    let warp = Vec2::new(
        200.0 * fbm(ws, 2),
        200.0 * fbm(ws + Vec2::new(5.2, 1.3), 2),
    );
    let p = shifted + warp;

    let base = amp * 0.7 * fbm(p * s, 6)
        + amp * 0.5 * fbm(p * (s * 2.5), 4)
        + amp * 0.15 * fbm(p * (s * 6.0), 3);
    let ridges = amp * 0.35 * ridged_fbm(p * (s * 3.0), 5);
    let undulation = amp * 0.25 * fbm(p * (s * 0.3), 2);
    let mut h = base + ridges + undulation;

    let d = noise2d(p * (s * 0.8) + Vec2::new(31.7, 47.3));
    if d < -0.6 {
        let t = (-0.6 - d) / 0.4;
        h -= amp * 0.8 * t * t;
    }
    let c = noise2d(p * 0.00015 + Vec2::new(91.3, 12.9));
    if c > 0.7 {
        let t = (c - 0.7) / 0.3;
        h -= amp * 1.2 * t * t;
    }

    let (blend, id) = classify_shifted(u, shifted);
    let own = apply_landform(u, landform_row(u, id), h, p);

    let band = u.landform_blend;
    let count = u.biome_count.max(1);
    if band <= 0.0 || count < 2 {
        return own;
    }
    let f = blend * count as f32 - id as f32;
    if f > 1.0 - band {
        let other = apply_landform(u, landform_row(u, (id + 1) % count), h, p);
        own + (other - own) * (0.5 * smooth_step(1.0 - band, 1.0, f))
    } else if f < band {
        let other = apply_landform(u, landform_row(u, (id + count - 1) % count), h, p);
        own + (other - own) * (0.5 * (1.0 - smooth_step(0.0, band, f)))
    } else {
        own
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_kernel;

    #[test]
    fn test_vector_noise_matches_scalar_kernel() {
        for i in 0..400 {
            let x = i as f32 * 0.731 - 90.0;
            let y = i as f32 * -0.277 + 13.0;
            let a = noise2d(Vec2::new(x, y));
            let b = noise_kernel::noise2d(x, y);
            assert!((a - b).abs() < 1e-6, "({x}, {y}): {a} vs {b}");
        }
    }

    #[test]
    fn test_fbm_zero_octaves() {
        assert_eq!(fbm(Vec2::new(3.0, 4.0), 0), 0.0);
        assert_eq!(ridged_fbm(Vec2::new(3.0, 4.0), 0), 0.0);
    }

    #[test]
    fn test_empty_landform_table_is_natural() {
        let mut u = TerrainUniform::from_params(&crate::TerrainParameters::default());
        u.landform_count = 0;
        let natural = {
            let mut n = u;
            n.landforms = [[0.0; 4]; 16];
            n.landform_count = 1;
            n
        };
        for i in 0..50 {
            let z = i as f32 * 211.0;
            assert_eq!(terrain_height(&u, 5.0, z), terrain_height(&natural, 5.0, z));
        }
    }
}

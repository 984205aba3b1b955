//! Seedless 2D simplex gradient noise shared by the CPU and GPU evaluators.
//!
//! The permutation is the polynomial `mod 289` hash, so no lookup table has to
//! be uploaded or kept in sync with the WGSL copy in [`crate::shader`]. Every
//! constant and every operation below has a one-to-one counterpart in
//! `TERRAIN_HEIGHT_WGSL`; reordering either side is a parity bug.
//!
//! All arithmetic is `f32`. Intermediate permutation values stay below 2^24,
//! so they are exact integers in single precision on both paths.

use noise::{NoiseFn, ScalePoint, TranslatePoint};

/// Skew/unskew constants: `(3 - sqrt(3)) / 6`, `(sqrt(3) - 1) / 2`,
/// `-1 + 2 * C0`, and `1 / 41`.
pub const SIMPLEX_C: [f32; 4] = [
    0.211_324_87,
    0.366_025_4,
    -0.577_350_26,
    0.024_390_243,
];

/// Output scale that maps the raw kernel sum onto roughly `[-1, 1]`.
pub const NOISE_NORMALIZATION: f32 = 130.0;

const INV_289: f32 = 1.0 / 289.0;

#[inline]
pub(crate) fn floor(v: f32) -> f32 {
    libm::floorf(v)
}

/// `v - floor(v)`. In `[0, 1]` for finite input; tiny negative inputs round
/// up to exactly `1.0`, which callers that index with it must fold to `0.0`.
#[inline]
pub fn fract(v: f32) -> f32 {
    v - floor(v)
}

#[inline]
fn mod289(v: f32) -> f32 {
    v - floor(v * INV_289) * 289.0
}

#[inline]
fn permute(v: f32) -> f32 {
    mod289((v * 34.0 + 1.0) * v)
}

/// Evaluate 2D simplex noise at `(x, y)`.
///
/// Deterministic and stateless; there is deliberately no seed parameter.
/// Callers that need a different world shift their coordinates instead.
pub fn noise2d(x: f32, y: f32) -> f32 {
    let [c0, c1, c2, c3] = SIMPLEX_C;

    // First corner.
    let skew = (x + y) * c1;
    let mut ix = floor(x + skew);
    let mut iy = floor(y + skew);
    let unskew = (ix + iy) * c0;
    let x0x = x - ix + unskew;
    let x0y = y - iy + unskew;

    // Middle corner depends on which triangle of the skewed cell we are in.
    let (i1x, i1y) = if x0x > x0y { (1.0, 0.0) } else { (0.0, 1.0) };

    let x1x = x0x + c0 - i1x;
    let x1y = x0y + c0 - i1y;
    let x2x = x0x + c2;
    let x2y = x0y + c2;

    ix = mod289(ix);
    iy = mod289(iy);
    let p0 = permute(permute(iy) + ix);
    let p1 = permute(permute(iy + i1y) + ix + i1x);
    let p2 = permute(permute(iy + 1.0) + ix + 1.0);

    let mut m0 = (0.5 - (x0x * x0x + x0y * x0y)).max(0.0);
    let mut m1 = (0.5 - (x1x * x1x + x1y * x1y)).max(0.0);
    let mut m2 = (0.5 - (x2x * x2x + x2y * x2y)).max(0.0);
    m0 = m0 * m0;
    m1 = m1 * m1;
    m2 = m2 * m2;
    m0 = m0 * m0;
    m1 = m1 * m1;
    m2 = m2 * m2;

    // Gradients from 41 points spread over a line, mapped onto a diamond.
    let gx0 = 2.0 * fract(p0 * c3) - 1.0;
    let gx1 = 2.0 * fract(p1 * c3) - 1.0;
    let gx2 = 2.0 * fract(p2 * c3) - 1.0;
    let h0 = gx0.abs() - 0.5;
    let h1 = gx1.abs() - 0.5;
    let h2 = gx2.abs() - 0.5;
    let a0 = gx0 - floor(gx0 + 0.5);
    let a1 = gx1 - floor(gx1 + 0.5);
    let a2 = gx2 - floor(gx2 + 0.5);

    // Approximate gradient normalization.
    m0 *= 1.792_842_9 - 0.853_734_7 * (a0 * a0 + h0 * h0);
    m1 *= 1.792_842_9 - 0.853_734_7 * (a1 * a1 + h1 * h1);
    m2 *= 1.792_842_9 - 0.853_734_7 * (a2 * a2 + h2 * h2);

    let g0 = a0 * x0x + h0 * x0y;
    let g1 = a1 * x1x + h1 * x1y;
    let g2 = a2 * x2x + h2 * x2y;

    NOISE_NORMALIZATION * (m0 * g0 + m1 * g1 + m2 * g2)
}

/// [`noise2d`] as a `noise` crate source, so it can be fed through that
/// crate's combinators (`ScaleBias`, `Turbulence`, ...).
///
/// Inputs are narrowed to `f32` before evaluation so the result matches the
/// terrain evaluators exactly.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoiseKernel;

impl NoiseFn<f64, 2> for NoiseKernel {
    fn get(&self, point: [f64; 2]) -> f64 {
        f64::from(noise2d(point[0] as f32, point[1] as f32))
    }
}

/// The kernel as the composer's first base octave sees it: world
/// coordinates shifted by the seed offset, then scaled by the terrain
/// frequency.
pub fn base_noise_layer(
    scale: f32,
    seed_offset: [f32; 2],
) -> TranslatePoint<ScalePoint<NoiseKernel>> {
    TranslatePoint::new(ScalePoint::new(NoiseKernel).set_scale(f64::from(scale)))
        .set_x_translation(f64::from(seed_offset[0]))
        .set_y_translation(f64::from(seed_offset[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_deterministic() {
        for i in 0..200 {
            let x = i as f32 * 0.731 - 40.0;
            let y = i as f32 * -1.37 + 12.5;
            assert_eq!(
                noise2d(x, y).to_bits(),
                noise2d(x, y).to_bits(),
                "noise2d must be bit-identical across calls at ({x}, {y})"
            );
        }
    }

    #[test]
    fn test_noise_range() {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for i in 0..300 {
            for j in 0..300 {
                let v = noise2d(i as f32 * 0.093, j as f32 * 0.071);
                assert!(v.is_finite());
                min = min.min(v);
                max = max.max(v);
            }
        }
        assert!(min >= -1.05 && max <= 1.05, "range [{min}, {max}] too wide");
        assert!(min < -0.5 && max > 0.5, "range [{min}, {max}] suspiciously narrow");
    }

    #[test]
    fn test_noise_is_zero_on_lattice_origin() {
        // All three corner offsets vanish or fall outside the kernel radius.
        assert!(noise2d(0.0, 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_noise_is_continuous() {
        let step = 1e-3;
        for i in 0..2_000 {
            let x = i as f32 * 0.01 - 7.0;
            let delta = (noise2d(x + step, 3.3) - noise2d(x, 3.3)).abs();
            assert!(delta < 0.05, "jump of {delta} at x={x}");
        }
    }

    #[test]
    fn test_negative_coordinates_are_well_behaved() {
        for i in 0..500 {
            let v = noise2d(-(i as f32) * 13.7, -(i as f32) * 5.1);
            assert!(v.is_finite() && v.abs() <= 1.05);
        }
    }

    #[test]
    fn test_fract_boundaries() {
        assert_eq!(fract(0.0), 0.0);
        assert_eq!(fract(2.0), 0.0);
        assert!((fract(-0.25) - 0.75).abs() < 1e-7);
        assert_eq!(fract(-1e-9), 1.0);
    }

    #[test]
    fn test_base_layer_shifts_then_scales() {
        let layer = base_noise_layer(0.01, [100.0, -50.0]);
        let expected = noise2d((30.0 + 100.0) * 0.01, (-20.0 - 50.0) * 0.01);
        assert!((layer.get([30.0, -20.0]) - f64::from(expected)).abs() < 1e-6);
    }

    #[test]
    fn test_noise_fn_adapter_matches_kernel() {
        let kernel = NoiseKernel;
        let direct = noise2d(1.25, -3.5);
        let adapted = kernel.get([1.25, -3.5]);
        assert_eq!(adapted, f64::from(direct));
    }
}

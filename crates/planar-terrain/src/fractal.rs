//! Multi-octave fractal sums over [`noise2d`].
//!
//! Both sums use the fixed progression the GPU evaluator hard-codes:
//! amplitude starts at 0.5 and halves, frequency starts at 1 and doubles.
//! Results are divided by the total amplitude so the output range does not
//! depend on the octave count.

use crate::noise_kernel::noise2d;

/// Frequency multiplier between successive octaves.
pub const LACUNARITY: f32 = 2.0;
/// Amplitude multiplier between successive octaves.
pub const GAIN: f32 = 0.5;

/// Normalized fractal Brownian motion. Range roughly `[-1, 1]`.
///
/// Returns `0.0` for `octaves == 0`.
pub fn fbm(x: f32, y: f32, octaves: u32) -> f32 {
    let mut value = 0.0;
    let mut total = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;

    for _ in 0..octaves {
        value += amplitude * noise2d(x * frequency, y * frequency);
        total += amplitude;
        amplitude *= GAIN;
        frequency *= LACUNARITY;
    }

    if total > 0.0 { value / total } else { 0.0 }
}

/// Normalized ridged fractal sum. Each octave contributes `(1 - |n|)^2`,
/// which peaks sharply where the underlying noise crosses zero.
///
/// Range `[0, 1]`; returns `0.0` for `octaves == 0`.
pub fn ridged_fbm(x: f32, y: f32, octaves: u32) -> f32 {
    let mut value = 0.0;
    let mut total = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;

    for _ in 0..octaves {
        let ridge = 1.0 - noise2d(x * frequency, y * frequency).abs();
        value += amplitude * (ridge * ridge);
        total += amplitude;
        amplitude *= GAIN;
        frequency *= LACUNARITY;
    }

    if total > 0.0 { value / total } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_octaves_is_zero() {
        assert_eq!(fbm(12.0, 7.0, 0), 0.0);
        assert_eq!(ridged_fbm(12.0, 7.0, 0), 0.0);
    }

    #[test]
    fn test_single_octave_fbm_is_raw_noise() {
        let x = 3.7;
        let y = -1.9;
        assert!((fbm(x, y, 1) - noise2d(x, y)).abs() < 1e-6);
    }

    #[test]
    fn test_fbm_stays_normalized() {
        for octaves in 1..=8 {
            for i in 0..400 {
                let x = i as f32 * 0.137;
                let v = fbm(x, x * 0.61 + 4.0, octaves);
                assert!(
                    v.abs() <= 1.05,
                    "fbm({octaves} octaves) = {v} at x={x} exceeds normalized range"
                );
            }
        }
    }

    #[test]
    fn test_ridged_range() {
        for i in 0..1_000 {
            let x = i as f32 * 0.051 - 20.0;
            let v = ridged_fbm(x, 0.37 * x, 5);
            assert!(
                (0.0..=1.0).contains(&v),
                "ridged_fbm = {v} at x={x} is outside [0, 1]"
            );
        }
    }

    #[test]
    fn test_more_octaves_adds_detail() {
        // Step well below the sixth octave's wavelength (1/32) so every
        // octave's slope is resolved instead of aliased.
        let step = 0.002;
        let mut diff_1 = 0.0;
        let mut diff_6 = 0.0;
        let mut spread = 0.0;
        for i in 0..20_000 {
            let x = i as f32 * step;
            diff_1 += (fbm(x + step, 0.5, 1) - fbm(x, 0.5, 1)).abs();
            diff_6 += (fbm(x + step, 0.5, 6) - fbm(x, 0.5, 6)).abs();
            spread += (fbm(x, 0.5, 6) - fbm(x, 0.5, 1)).abs();
        }
        assert!(
            diff_6 > diff_1,
            "6 octaves should carry more high-frequency detail: {diff_6} vs {diff_1}"
        );
        let mean_spread = spread / 20_000.0;
        assert!(mean_spread > 0.01, "upper octaves barely change fbm: {mean_spread}");
    }
}

//! Seed handling and deterministic math helpers.
//!
//! The noise kernel has no seed. A world seed is turned into an additive
//! world-space offset instead, so the GPU and CPU evaluators only ever need
//! to agree on two floats.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Half-extent of the seed offset square, in world units.
///
/// Kept small enough that shifted coordinates near the origin still carry
/// millimetre precision in `f32`.
pub const SEED_OFFSET_RANGE: f32 = 4096.0;

/// Derive the world-space offset for a seed.
///
/// Seed `0` maps to `(0, 0)` so the unseeded world is the plain height
/// function. Any other seed draws two values from a ChaCha8 stream, which is
/// stable across platforms and `rand` releases.
pub fn seed_offset(seed: u64) -> [f32; 2] {
    if seed == 0 {
        return [0.0, 0.0];
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let x = rng.random_range(-SEED_OFFSET_RANGE..SEED_OFFSET_RANGE);
    let z = rng.random_range(-SEED_OFFSET_RANGE..SEED_OFFSET_RANGE);
    [x, z]
}

/// Deterministic sine using libm (not platform libc).
#[inline]
pub fn det_sin(x: f32) -> f32 {
    libm::sinf(x)
}

/// Hermite smoothstep, matching WGSL `smoothstep` for `edge0 < edge1`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

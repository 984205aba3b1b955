//! Height-field composition.
//!
//! Combines warped fractal relief, ridges, a slow undulation, soft
//! depressions and sparse craters, then applies the landform modifier of the
//! biome at that position. The step order and every constant are mirrored in
//! [`crate::shader::TERRAIN_HEIGHT_WGSL`].

use std::f32::consts::TAU;

use crate::biome::{BiomeBlend, BiomeClassifier, BiomeId, Landform};
use crate::fractal::{fbm, ridged_fbm};
use crate::noise_kernel::{fract, noise2d};
use crate::params::TerrainParameters;
use crate::seed::{det_sin, smoothstep};

/// Maximum domain-warp displacement in world units.
pub const WARP_AMPLITUDE: f32 = 200.0;
/// Warp noise frequency relative to `terrain_scale`.
pub const WARP_FREQUENCY: f32 = 0.4;
/// Depressions start where their noise drops below this value.
pub const DEPRESSION_THRESHOLD: f32 = -0.6;
/// Craters start where their noise rises above this value.
pub const CRATER_THRESHOLD: f32 = 0.7;
/// Crater noise frequency per world unit, independent of `terrain_scale`.
pub const CRATER_FREQUENCY: f32 = 0.00015;

/// Intermediate values of one height evaluation, stage by stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightBreakdown {
    /// Domain-warp displacement `(wx, wz)`.
    pub warp: [f32; 2],
    /// Three-band fBm relief.
    pub base: f32,
    /// Ridged contribution.
    pub ridges: f32,
    /// Low-frequency undulation.
    pub undulation: f32,
    /// Depth removed by soft depressions (≥ 0).
    pub depression: f32,
    /// Depth removed by craters (≥ 0).
    pub crater: f32,
    /// Height before the landform override.
    pub pre_landform: f32,
    /// Final height.
    pub height: f32,
    /// Biome classification used for the landform override.
    pub biome: BiomeBlend,
}

/// Evaluates terrain heights for one set of parameters.
///
/// Construction sanitizes the parameters, so every query returns a finite
/// height.
#[derive(Clone, Debug)]
pub struct HeightFieldComposer {
    params: TerrainParameters,
    classifier: BiomeClassifier,
}

impl HeightFieldComposer {
    /// Create a composer; invalid parameter fields are normalized.
    pub fn new(params: TerrainParameters) -> Self {
        let params = params.sanitized();
        let classifier = BiomeClassifier::new(&params);
        Self { params, classifier }
    }

    /// The sanitized parameters in use.
    pub fn params(&self) -> &TerrainParameters {
        &self.params
    }

    /// The classifier derived from the parameters.
    pub fn classifier(&self) -> &BiomeClassifier {
        &self.classifier
    }

    /// Classify a true world position.
    pub fn classify(&self, world_x: f32, world_z: f32) -> BiomeBlend {
        self.classifier.classify(world_x, world_z)
    }

    /// Terrain height at a true (unwrapped) world position.
    pub fn height(&self, world_x: f32, world_z: f32) -> f32 {
        self.breakdown(world_x, world_z).height
    }

    /// Landform assigned to biome slot `id`; natural when the list is empty.
    pub fn landform_for(&self, id: BiomeId) -> Landform {
        let biomes = &self.params.biomes;
        if biomes.is_empty() {
            Landform::Natural
        } else {
            biomes[id.0 as usize % biomes.len()].landform
        }
    }

    /// Full stage-by-stage evaluation.
    pub fn breakdown(&self, world_x: f32, world_z: f32) -> HeightBreakdown {
        let s = self.params.terrain_scale;
        let amp = self.params.terrain_height;
        let [ox, oz] = self.params.seed_offset();
        let sx = world_x + ox;
        let sz = world_z + oz;

        // 1. Domain warp.
        let ws = s * WARP_FREQUENCY;
        let wx = WARP_AMPLITUDE * fbm(sx * ws, sz * ws, 2);
        let wz = WARP_AMPLITUDE * fbm(sx * ws + 5.2, sz * ws + 1.3, 2);
        let px = sx + wx;
        let pz = sz + wz;

        // 2. Base relief in three bands.
        let f1 = s * 2.5;
        let f2 = s * 6.0;
        let base = amp * 0.7 * fbm(px * s, pz * s, 6)
            + amp * 0.5 * fbm(px * f1, pz * f1, 4)
            + amp * 0.15 * fbm(px * f2, pz * f2, 3);

        // 3. Ridges.
        let fr = s * 3.0;
        let ridges = amp * 0.35 * ridged_fbm(px * fr, pz * fr, 5);

        // 4. Large undulation.
        let fu = s * 0.3;
        let undulation = amp * 0.25 * fbm(px * fu, pz * fu, 2);

        let mut h = base + ridges + undulation;

        // 5. Soft depressions.
        let fd = s * 0.8;
        let d = noise2d(px * fd + 31.7, pz * fd + 47.3);
        let mut depression = 0.0;
        if d < DEPRESSION_THRESHOLD {
            let t = (DEPRESSION_THRESHOLD - d) / 0.4;
            depression = amp * 0.8 * t * t;
            h -= depression;
        }

        // 6. Sparse craters.
        let c = noise2d(px * CRATER_FREQUENCY + 91.3, pz * CRATER_FREQUENCY + 12.9);
        let mut crater = 0.0;
        if c > CRATER_THRESHOLD {
            let t = (c - CRATER_THRESHOLD) / 0.3;
            crater = amp * 1.2 * t * t;
            h -= crater;
        }

        let pre_landform = h;

        // 7. Biome landform override, selected at the unwarped position.
        let biome = self.classifier.classify_shifted(sx, sz);
        let height = self.apply_biome_landform(biome, h, px, pz);

        HeightBreakdown {
            warp: [wx, wz],
            base,
            ridges,
            undulation,
            depression,
            crater,
            pre_landform,
            height,
            biome,
        }
    }

    fn apply_biome_landform(&self, biome: BiomeBlend, h: f32, px: f32, pz: f32) -> f32 {
        let s = self.params.terrain_scale;
        let amp = self.params.terrain_height;
        let count = self.classifier.biome_count();
        let id = biome.biome_id.0;
        let own = apply_landform(self.landform_for(biome.biome_id), h, px, pz, s, amp);

        let band = self.params.landform_blend;
        if band <= 0.0 || count < 2 {
            return own;
        }

        let f = biome.blend * count as f32 - id as f32;
        if f > 1.0 - band {
            let next = BiomeId((id + 1) % count);
            let other = apply_landform(self.landform_for(next), h, px, pz, s, amp);
            let k = 0.5 * smoothstep(1.0 - band, 1.0, f);
            own + (other - own) * k
        } else if f < band {
            let prev = BiomeId((id + count - 1) % count);
            let other = apply_landform(self.landform_for(prev), h, px, pz, s, amp);
            let k = 0.5 * (1.0 - smoothstep(0.0, band, f));
            own + (other - own) * k
        } else {
            own
        }
    }
}

/// Apply one landform transform to a composed height.
///
/// `px`/`pz` are the warped sampling coordinates, `scale` and `amp` the
/// terrain scale and height.
pub fn apply_landform(landform: Landform, h: f32, px: f32, pz: f32, scale: f32, amp: f32) -> f32 {
    match landform {
        Landform::Natural => h,
        Landform::Flatten { factor } => h * factor,
        Landform::Terrace { step } => crate::noise_kernel::floor(h / step + 0.5) * step,
        Landform::Canyon { threshold, depth } => {
            let f = scale * 1.5;
            let c = noise2d(px * f + 7.7, pz * f + 3.1).abs();
            if c < threshold {
                let t = 1.0 - c / threshold;
                h - depth * amp * t * t
            } else {
                h
            }
        }
        Landform::Ripple {
            amplitude,
            wavelength,
        } => {
            let rx = det_sin(TAU * fract(px / wavelength));
            let rz = det_sin(TAU * fract(pz / wavelength));
            h + amplitude * amp * rx * rz
        }
        Landform::Sinkholes { threshold, depth } => {
            let f = scale * 4.0;
            let k = noise2d(px * f + 19.9, pz * f + 63.1);
            if k > threshold {
                let t = (k - threshold) / (1.0 - threshold);
                h - depth * amp * t * t
            } else {
                h
            }
        }
    }
}

//! Biome definition: colour ramp and landform modifier for one cyclic biome slot.

/// Linear RGB colour, each channel in `[0.0, 1.0]`.
pub type Rgb = [f32; 3];

/// Largest accepted `|factor|`, `|depth|` or `|amplitude|` of a landform.
pub const MAX_LANDFORM_MAGNITUDE: f32 = 8.0;
/// Smallest accepted terrace step or ripple wavelength, in world units.
pub const MIN_LANDFORM_LENGTH: f32 = 0.01;
/// Sinkholes divide by `1 - threshold`.
pub const MAX_SINKHOLE_THRESHOLD: f32 = 0.99;

/// Biome-specific landform transform applied as the last composition step.
///
/// Parameters are expressed relative to `terrain_height` where they describe
/// a depth or amplitude, so biomes keep their character when the overall
/// relief is rescaled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Landform {
    /// Leave the composed height untouched.
    Natural,
    /// Multiply the height by `factor` (values below 1 flatten).
    Flatten { factor: f32 },
    /// Snap the height to multiples of `step` world units.
    Terrace { step: f32 },
    /// Carve narrow channels where a secondary noise crosses zero.
    /// `threshold` is the channel half-width in noise units, `depth` a fraction
    /// of `terrain_height`.
    Canyon { threshold: f32, depth: f32 },
    /// Add a crossed sine pattern. `amplitude` is a fraction of
    /// `terrain_height`, `wavelength` is in world units.
    Ripple { amplitude: f32, wavelength: f32 },
    /// Punch round pits where a high-frequency noise exceeds `threshold`.
    Sinkholes { threshold: f32, depth: f32 },
}

impl Landform {
    /// Numeric tag used in the GPU landform table.
    pub fn kind(&self) -> u32 {
        match self {
            Landform::Natural => 0,
            Landform::Flatten { .. } => 1,
            Landform::Terrace { .. } => 2,
            Landform::Canyon { .. } => 3,
            Landform::Ripple { .. } => 4,
            Landform::Sinkholes { .. } => 5,
        }
    }

    /// Pack into the `(kind, a, b, 0)` row layout shared with the shader.
    pub fn to_row(&self) -> [f32; 4] {
        let kind = self.kind() as f32;
        match *self {
            Landform::Natural => [kind, 0.0, 0.0, 0.0],
            Landform::Flatten { factor } => [kind, factor, 0.0, 0.0],
            Landform::Terrace { step } => [kind, step, 0.0, 0.0],
            Landform::Canyon { threshold, depth } => [kind, threshold, depth, 0.0],
            Landform::Ripple {
                amplitude,
                wavelength,
            } => [kind, amplitude, wavelength, 0.0],
            Landform::Sinkholes { threshold, depth } => [kind, threshold, depth, 0.0],
        }
    }

    /// Rebuild a landform from a packed row. Unknown tags decode as
    /// [`Landform::Natural`].
    pub fn from_row(row: [f32; 4]) -> Self {
        match row[0] as u32 {
            1 => Landform::Flatten { factor: row[1] },
            2 => Landform::Terrace { step: row[1] },
            3 => Landform::Canyon {
                threshold: row[1],
                depth: row[2],
            },
            4 => Landform::Ripple {
                amplitude: row[1],
                wavelength: row[2],
            },
            5 => Landform::Sinkholes {
                threshold: row[1],
                depth: row[2],
            },
            _ => Landform::Natural,
        }
    }

    /// Whether every parameter is finite and inside the range the
    /// transform is defined for. Bounded magnitudes keep the transformed
    /// height finite for any height within the terrain limits.
    pub fn is_valid(&self) -> bool {
        let bounded = |v: f32| v.abs() <= MAX_LANDFORM_MAGNITUDE;
        match *self {
            Landform::Natural => true,
            Landform::Flatten { factor } => bounded(factor),
            Landform::Terrace { step } => step >= MIN_LANDFORM_LENGTH && step.is_finite(),
            Landform::Canyon { threshold, depth } => {
                threshold > 0.0 && threshold <= 1.0 && bounded(depth)
            }
            Landform::Ripple {
                amplitude,
                wavelength,
            } => bounded(amplitude) && wavelength >= MIN_LANDFORM_LENGTH && wavelength.is_finite(),
            Landform::Sinkholes { threshold, depth } => {
                (-1.0..=MAX_SINKHOLE_THRESHOLD).contains(&threshold) && bounded(depth)
            }
        }
    }
}

/// Full descriptor for one slot in the cyclic biome list.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeDefinition {
    /// Human-readable biome name (e.g., "mesa").
    pub name: String,
    /// Ground colour at the lowest elevations.
    pub low_color: Rgb,
    /// Ground colour at mid elevations.
    pub mid_color: Rgb,
    /// Ground colour at the highest elevations.
    pub high_color: Rgb,
    /// Shape modifier applied wherever this biome is active.
    pub landform: Landform,
}

impl BiomeDefinition {
    pub fn new(name: impl Into<String>, colors: [Rgb; 3], landform: Landform) -> Self {
        Self {
            name: name.into(),
            low_color: colors[0],
            mid_color: colors[1],
            high_color: colors[2],
            landform,
        }
    }
}

/// The five-biome cycle used when no explicit list is configured.
pub fn default_biomes() -> Vec<BiomeDefinition> {
    vec![
        BiomeDefinition::new(
            "meadow",
            [[0.20, 0.42, 0.16], [0.33, 0.52, 0.22], [0.78, 0.80, 0.74]],
            Landform::Natural,
        ),
        BiomeDefinition::new(
            "steppe",
            [[0.55, 0.52, 0.30], [0.62, 0.58, 0.36], [0.74, 0.70, 0.55]],
            Landform::Flatten { factor: 0.45 },
        ),
        BiomeDefinition::new(
            "mesa",
            [[0.66, 0.36, 0.20], [0.75, 0.45, 0.26], [0.86, 0.66, 0.48]],
            Landform::Terrace { step: 6.0 },
        ),
        BiomeDefinition::new(
            "badlands",
            [[0.42, 0.30, 0.24], [0.52, 0.40, 0.31], [0.64, 0.56, 0.48]],
            Landform::Canyon {
                threshold: 0.08,
                depth: 0.6,
            },
        ),
        BiomeDefinition::new(
            "shimmer",
            [[0.18, 0.26, 0.46], [0.36, 0.30, 0.62], [0.82, 0.74, 0.94]],
            Landform::Ripple {
                amplitude: 0.08,
                wavelength: 90.0,
            },
        ),
    ]
}

/// Limestone biome with scattered pits, not part of the default cycle.
pub fn karst_biome() -> BiomeDefinition {
    BiomeDefinition::new(
        "karst",
        [[0.46, 0.48, 0.44], [0.58, 0.60, 0.55], [0.84, 0.85, 0.82]],
        Landform::Sinkholes {
            threshold: 0.55,
            depth: 0.5,
        },
    )
}

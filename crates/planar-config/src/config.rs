//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level flyover configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Height-field parameters.
    pub terrain: TerrainConfig,
    /// Cached sampling window settings.
    pub sampler: SamplerConfigSection,
    /// Floating-origin wrap window.
    pub wrap: WrapConfig,
    /// Viewer motion and consumer placement for the demo.
    pub flight: FlightConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Which biome cycle to build.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum BiomePreset {
    /// The five default biomes.
    #[default]
    Standard,
    /// The default cycle followed by the sinkhole biome.
    WithKarst,
}

/// Terrain configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// World seed (0 = unshifted world).
    pub seed: u64,
    /// Base noise frequency per world unit.
    pub scale: f32,
    /// Vertical amplitude in world units.
    pub height: f32,
    /// Number of slots in the biome cycle.
    pub biome_count: u32,
    /// Biome blend advance per unit of world Z.
    pub cycle_speed: f32,
    /// Landform cross-fade band (0 = hard switch at biome edges).
    pub landform_blend: f32,
    /// Biome list to use.
    pub biomes: BiomePreset,
}

/// Sampler configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplerConfigSection {
    /// Side length of the cached window in world units.
    pub world_size: f32,
    /// Grid nodes per side.
    pub resolution: u32,
    /// Recenter once the viewer drifts this fraction of `world_size`.
    pub recenter_fraction: f32,
    /// Render windows with the GPU compute path when an adapter exists.
    pub use_gpu: bool,
}

/// Floating-origin wrap configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WrapConfig {
    /// Length of the repeating local Z interval.
    pub range: f32,
}

/// Flight configuration for the headless demo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlightConfig {
    /// Forward speed in world units per frame.
    pub speed: f32,
    /// Number of frames to simulate.
    pub frames: u32,
    /// Minimum camera height above the ground.
    pub camera_clearance: f32,
    /// Number of grass/flora instances placed around the viewer.
    pub ground_instances: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write heightmap and biome PNGs after the flight.
    pub dump_images: bool,
    /// Side length of the dumped images in pixels.
    pub image_size: u32,
    /// World units covered by the dumped images.
    pub image_extent: f32,
}

// --- Default implementations ---

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 0.0005,
            height: 35.0,
            biome_count: 5,
            cycle_speed: 0.0002,
            landform_blend: 0.0,
            biomes: BiomePreset::Standard,
        }
    }
}

impl Default for SamplerConfigSection {
    fn default() -> Self {
        Self {
            world_size: 300.0,
            resolution: 128,
            recenter_fraction: 0.25,
            use_gpu: true,
        }
    }
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self { range: 400.0 }
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            frames: 600,
            camera_clearance: 4.0,
            ground_instances: 256,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            dump_images: true,
            image_size: 256,
            image_extent: 4_000.0,
        }
    }
}

/// Platform config directory for the flyover (`<config_dir>/planar`), or
/// `./planar` when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planar")
}

// --- Load / Save / Reload ---

impl Config {
    /// Read `config.ron` from `config_dir`. A missing file is replaced by a
    /// freshly written default.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default flyover config to {}", path.display());
            return Ok(config);
        }
        let config = Self::read_from(&path)?;
        log::info!("Loaded flyover config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty RON to `config_dir/config.ron`, creating the
    /// directory when needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_err)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Encode)?;
        std::fs::write(&path, text).map_err(write_err)
    }

    /// Re-read the file; `Some` only when its contents differ from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = Self::read_from(&config_dir.join(CONFIG_FILE))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Flyover config changed on disk");
        Ok(Some(fresh))
    }

    fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

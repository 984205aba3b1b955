//! Command-line argument parsing for the flyover demo.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Planar flyover command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "planar", about = "Headless planar terrain flyover")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Terrain noise frequency per world unit.
    #[arg(long)]
    pub scale: Option<f32>,

    /// Terrain vertical amplitude.
    #[arg(long)]
    pub height: Option<f32>,

    /// Number of biomes in the cycle.
    #[arg(long)]
    pub biome_count: Option<u32>,

    /// Side length of the cached height window.
    #[arg(long)]
    pub world_size: Option<f32>,

    /// Grid nodes per side of the cached height window.
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Use the GPU compute path (true/false).
    #[arg(long)]
    pub gpu: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of frames to fly.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Directory for debug images and logs.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(scale) = args.scale {
            self.terrain.scale = scale;
        }
        if let Some(height) = args.height {
            self.terrain.height = height;
        }
        if let Some(count) = args.biome_count {
            self.terrain.biome_count = count;
        }
        if let Some(size) = args.world_size {
            self.sampler.world_size = size;
        }
        if let Some(res) = args.resolution {
            self.sampler.resolution = res;
        }
        if let Some(gpu) = args.gpu {
            self.sampler.use_gpu = gpu;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(frames) = args.frames {
            self.flight.frames = frames;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(42),
            height: Some(60.0),
            gpu: Some(false),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.terrain.seed, 42);
        assert_eq!(config.terrain.height, 60.0);
        assert!(!config.sampler.use_gpu);
        // Non-overridden fields retain defaults
        assert_eq!(config.terrain.scale, 0.0005);
        assert_eq!(config.sampler.world_size, 300.0);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "planar",
            "--seed",
            "7",
            "--resolution",
            "64",
            "--gpu",
            "false",
            "--output",
            "out",
        ]);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.resolution, Some(64));
        assert_eq!(args.gpu, Some(false));
        assert_eq!(args.output, Some(PathBuf::from("out")));
    }
}

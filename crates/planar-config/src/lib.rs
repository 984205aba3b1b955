//! Configuration for the planar flyover.
//!
//! Runtime-configurable terrain, sampler and flight settings that persist to
//! disk as RON files. Supports CLI overrides via clap, hot-reload detection,
//! and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BiomePreset, Config, DebugConfig, FlightConfig, SamplerConfigSection, TerrainConfig,
    WrapConfig, default_config_dir,
};
pub use error::ConfigError;

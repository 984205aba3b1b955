//! Errors from reading and writing the flyover config file.

use std::path::PathBuf;

/// Why a flyover config could not be loaded or stored. File errors carry the
/// path they concern.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read flyover config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write flyover config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a valid flyover config.
    #[error("flyover config {} is not valid RON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("cannot encode flyover config as RON: {0}")]
    Encode(#[source] ron::Error),
}

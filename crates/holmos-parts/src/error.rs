//! Error types for part generation.

use crate::base::MountKind;
use holmos::CadError;
use thiserror::Error;

/// Errors that can occur while building or writing parts.
#[derive(Error, Debug)]
pub enum CageError {
    /// The part only fits the three-rod cage.
    #[error("part requires the rod-mount cage (mount = \"rods30\"), configured for {0:?}")]
    RodMountRequired(MountKind),

    /// Filesystem error, e.g. while creating the output directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Geometry export failed.
    #[error(transparent)]
    Cad(#[from] CadError),

    /// Config file could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// IR document could not be serialized.
    #[error("IR serialization failed: {0}")]
    Ir(#[from] serde_json::Error),
}

/// Result type for part generation.
pub type Result<T> = std::result::Result<T, CageError>;

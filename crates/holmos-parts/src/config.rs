//! Generator settings, loadable from TOML.
//!
//! Every field has a default, so an empty file (or no file) reproduces the
//! stock catalogue in `scad/misc`:
//!
//! ```toml
//! output_dir = "scad/misc"
//! assemble = false
//! write_ir = false
//!
//! [quality]
//! fine = true
//! min_face_angle = 5.0
//! min_face_size = 0.1
//!
//! [cage]
//! mount = "rods30"
//! ```

use crate::base::CageConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tessellation quality written into every file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quality {
    /// Emit `$fa`/`$fs` settings. Off leaves OpenSCAD's coarse defaults.
    pub fine: bool,
    /// Minimum angle of a circle fragment (degrees).
    pub min_face_angle: f64,
    /// Minimum size of a circle fragment (mm).
    pub min_face_size: f64,
}

impl Default for Quality {
    fn default() -> Self {
        Self {
            fine: true,
            min_face_angle: 5.0,
            min_face_size: 0.1,
        }
    }
}

impl Quality {
    /// Header line placed at the top of each `.scad` file.
    pub fn header(&self) -> String {
        if self.fine {
            format!("$fa = {};$fs = {};", self.min_face_angle, self.min_face_size)
        } else {
            String::new()
        }
    }
}

/// Settings for [`generate_all`](crate::generate::generate_all).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory the `.scad` files are written to; created if missing.
    pub output_dir: PathBuf,
    /// Build parts in their assembled pose instead of the print pose.
    pub assemble: bool,
    /// Also write each part's IR document as `<stem>.json`.
    pub write_ir: bool,
    /// Header quality.
    pub quality: Quality,
    /// Cage the parts are built for.
    pub cage: CageConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("scad/misc"),
            assemble: false,
            write_ir: false,
            quality: Quality::default(),
            cage: CageConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read settings from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::MountKind;
    use crate::error::CageError;

    #[test]
    fn default_header() {
        assert_eq!(Quality::default().header(), "$fa = 5;$fs = 0.1;");
    }

    #[test]
    fn coarse_quality_has_no_header() {
        let q = Quality {
            fine: false,
            ..Quality::default()
        };
        assert_eq!(q.header(), "");
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = GeneratorConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GeneratorConfig::default());
        assert_eq!(cfg.output_dir, PathBuf::from("scad/misc"));
        assert!(cfg.cage.is_rod_mount());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let cfg = GeneratorConfig::from_toml_str(
            r#"
            output_dir = "out"
            write_ir = true

            [quality]
            min_face_angle = 2.5

            [cage]
            mount = "threads20"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
        assert!(cfg.write_ir);
        assert!(!cfg.assemble);
        assert_eq!(cfg.quality.header(), "$fa = 2.5;$fs = 0.1;");
        assert_eq!(cfg.cage.mount, MountKind::Threads20);
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = GeneratorConfig::from_toml_str("assemble = \"yes\"").unwrap_err();
        assert!(matches!(err, CageError::Config(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GeneratorConfig::from_file("/nonexistent/holmos.toml").unwrap_err();
        assert!(matches!(err, CageError::Io(_)));
    }
}

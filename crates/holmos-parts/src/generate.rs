//! Writes the part catalogue to disk.

use crate::base::CageConfig;
use crate::cage::{
    board_hook, cage_base_plate, cage_circumference, cage_side_stabilizer, cage_stabilizer,
    rpi_mount, DEFAULT_CIRCUMFERENCE_D_OUTER, DEFAULT_CIRCUMFERENCE_H, DEFAULT_CIRCUMFERENCE_WALL,
    DEFAULT_HOOK_CLIP_Z, DEFAULT_HOOK_OPENING, DEFAULT_RPI_HOLE_DIAM,
};
use crate::config::GeneratorConfig;
use crate::error::Result;
use holmos::Part;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Parts written by [`generate_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// [`cage_stabilizer`]
    CageStabilizer,
    /// [`cage_side_stabilizer`]
    CageSideStabilizer,
    /// [`cage_base_plate`]
    CageBasePlate,
    /// [`rpi_mount`]
    RpiMount,
    /// [`board_hook`]
    WallHook,
    /// [`cage_circumference`]
    CageCircumference,
}

/// Every part and its output file name, in write order.
pub const CATALOGUE: [(PartKind, &str); 6] = [
    PartKind::CageStabilizer.entry(),
    PartKind::CageSideStabilizer.entry(),
    PartKind::CageBasePlate.entry(),
    PartKind::RpiMount.entry(),
    PartKind::WallHook.entry(),
    PartKind::CageCircumference.entry(),
];

impl PartKind {
    /// Output file name of this part.
    pub const fn file_name(self) -> &'static str {
        match self {
            PartKind::CageStabilizer => "Cage_Stabilizer.scad",
            PartKind::CageSideStabilizer => "Cage_Side_Stabilizer.scad",
            PartKind::CageBasePlate => "Cage_Base_Plate.scad",
            PartKind::RpiMount => "rpi_mount.scad",
            PartKind::WallHook => "wall_hook.scad",
            PartKind::CageCircumference => "cage_circumference.scad",
        }
    }

    const fn entry(self) -> (PartKind, &'static str) {
        (self, self.file_name())
    }

    /// Build the part with its default dimensions.
    pub fn build(self, cfg: &CageConfig, assemble: bool) -> Result<Part> {
        let part = match self {
            PartKind::CageStabilizer => cage_stabilizer(cfg, assemble),
            PartKind::CageSideStabilizer => cage_side_stabilizer(),
            PartKind::CageBasePlate => cage_base_plate(cfg, assemble),
            PartKind::RpiMount => rpi_mount(cfg, assemble, DEFAULT_RPI_HOLE_DIAM),
            PartKind::WallHook => {
                board_hook(cfg, DEFAULT_HOOK_CLIP_Z, DEFAULT_HOOK_OPENING, assemble)?
            }
            PartKind::CageCircumference => cage_circumference(
                cfg,
                DEFAULT_CIRCUMFERENCE_D_OUTER,
                DEFAULT_CIRCUMFERENCE_WALL,
                DEFAULT_CIRCUMFERENCE_H,
                assemble,
            ),
        };
        debug!(kind = ?self, nodes = part.node_count(), "built part");
        Ok(part)
    }
}

/// Build every part in [`CATALOGUE`] and write it to `config.output_dir`.
///
/// Returns the paths written, `.scad` files and (with `write_ir`) their
/// `.json` IR documents. Stops at the first failure.
#[instrument(skip(config), fields(output_dir = %config.output_dir.display()))]
pub fn generate_all(config: &GeneratorConfig) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&config.output_dir)?;
    let header = config.quality.header();

    let mut written = Vec::new();
    for (kind, file_name) in CATALOGUE {
        let part = kind.build(&config.cage, config.assemble)?;

        let path = config.output_dir.join(file_name);
        part.write_scad(&path, &header)?;
        info!(path = %path.display(), "wrote part");
        written.push(path.clone());

        if config.write_ir {
            let ir_path = path.with_extension("json");
            std::fs::write(&ir_path, part.to_document().to_json()?)?;
            info!(path = %ir_path.display(), "wrote IR document");
            written.push(ir_path);
        }
    }
    Ok(written)
}

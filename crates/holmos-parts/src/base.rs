//! Rod geometry and rod clamps shared by all cage parts.
//!
//! Coordinates follow the cage: the optical axis runs along z through the
//! origin, the main rod pair sits at `x = ±RODS30_SEP / 2`, `y = RODS30_MAIN_Y`,
//! and the third rod at `x = 0`, `y = RODS30_DIST_THIRD_ROD + RODS30_MAIN_Y`.

use holmos::{centered_cube, centered_cylinder, Part};
use serde::{Deserialize, Serialize};

/// Cage rod diameter.
pub const ROD_DIAMETER: f64 = 6.0;
/// Wall thickness of a clamp ring.
pub const CLAMP_WALL: f64 = 1.5;
/// Depth of the clamp foot behind the rod.
pub const CLAMP_FOOT: f64 = 5.0;
/// Width of the snap-in opening; narrower than the rod so the clamp grips.
pub const CLAMP_OPENING: f64 = 4.5;

/// x separation of the main rod pair.
pub const RODS30_SEP: f64 = 30.0;
/// y position of the main rod pair.
pub const RODS30_MAIN_Y: f64 = -25.0;
/// Distance of the third rod from the line through the main pair,
/// `25 + sqrt(15² + 25²)`: all three rods lie on one circle around the axis.
pub const RODS30_DIST_THIRD_ROD: f64 = 54.154_759_474_226_5;
/// Distance between a main rod and the third rod, `sqrt(15² + dist²)`.
pub const RODS30_DIAG_THIRD_ROD: f64 = 56.193_753_867_412_39;

/// Separation of the two threaded rods.
pub const THREADS20_SEP: f64 = 20.0;
/// Clearance hole for a threaded rod.
pub const THREAD_HOLE_DIAMETER: f64 = 4.4;

/// Default clamp length along the rod.
pub const DEFAULT_Z_LENGTH: f64 = 10.0;

/// How parts attach to the cage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountKind {
    /// Three smooth rods clipped by snap clamps (main pair 30 apart).
    #[default]
    Rods30,
    /// Two threaded rods passing through drilled blocks.
    Threads20,
}

/// Cage configuration passed into every builder that depends on the mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CageConfig {
    /// Mount style of the cage.
    pub mount: MountKind,
}

impl CageConfig {
    /// Configuration for the three-rod cage.
    pub fn rods30() -> Self {
        Self {
            mount: MountKind::Rods30,
        }
    }

    /// Configuration for the threaded-rod cage.
    pub fn threads20() -> Self {
        Self {
            mount: MountKind::Threads20,
        }
    }

    /// Whether parts clip onto smooth rods.
    pub fn is_rod_mount(&self) -> bool {
        self.mount == MountKind::Rods30
    }
}

/// Snap clamp around a rod at the origin.
///
/// The opening faces +y, the foot extends `CLAMP_FOOT` towards −y.
/// Centered in z.
pub fn single_rod_clamp(z_length: f64) -> Part {
    let outer_r = ROD_DIAMETER / 2.0 + CLAMP_WALL;

    let ring = centered_cylinder("rod_clamp", outer_r, z_length, 0);
    let foot = centered_cube("clamp_foot", 2.0 * outer_r, CLAMP_FOOT, z_length).translate(
        0.0,
        -CLAMP_FOOT / 2.0,
        0.0,
    );
    let bore = centered_cylinder("rod", ROD_DIAMETER / 2.0, z_length + 1.0, 0);
    let opening = centered_cube("clamp_opening", CLAMP_OPENING, outer_r, z_length + 1.0)
        .translate(0.0, ROD_DIAMETER / 4.0 + outer_r / 2.0, 0.0);

    (ring + foot - bore - opening).named("rod_clamp")
}

/// Two clamps for the main rod pair, joined by a bridge on the −y side.
pub fn base_rods30(rod_sep: f64, z_length: f64) -> Part {
    let bore = centered_cylinder("rod", ROD_DIAMETER / 2.0, z_length + 1.0, 0);
    let clamp = single_rod_clamp(z_length);

    let mut pair = centered_cube("bridge", rod_sep, CLAMP_FOOT, z_length).translate(
        0.0,
        RODS30_MAIN_Y - CLAMP_FOOT / 2.0,
        0.0,
    );
    for x in [-rod_sep / 2.0, rod_sep / 2.0] {
        pair -= bore.translate(x, RODS30_MAIN_Y, 0.0);
    }
    for x in [-rod_sep / 2.0, rod_sep / 2.0] {
        pair += clamp.translate(x, RODS30_MAIN_Y, 0.0);
    }
    pair.named("base_rods30")
}

/// Block with two clearance holes for the threaded-rod cage.
pub fn base_threads20(z_length: f64) -> Part {
    let width = THREADS20_SEP + 2.0 * THREAD_HOLE_DIAMETER;
    let mut block = centered_cube("base_threads20", width, 2.0 * CLAMP_FOOT, z_length).translate(
        0.0,
        RODS30_MAIN_Y,
        0.0,
    );
    let hole = centered_cylinder("thread", THREAD_HOLE_DIAMETER / 2.0, z_length + 1.0, 0);
    for x in [-THREADS20_SEP / 2.0, THREADS20_SEP / 2.0] {
        block -= hole.translate(x, RODS30_MAIN_Y, 0.0);
    }
    block
}

/// Mount for the configured cage.
///
/// The threaded-rod cage has a fixed rod separation, so `rod_sep` only
/// applies to [`MountKind::Rods30`].
pub fn base(cfg: &CageConfig, rod_sep: f64, z_length: f64) -> Part {
    match cfg.mount {
        MountKind::Rods30 => base_rods30(rod_sep, z_length),
        MountKind::Threads20 => base_threads20(z_length),
    }
}

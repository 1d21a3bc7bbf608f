//! Part builders for the HolMOS cage.
//!
//! Each builder returns a fresh [`Part`]. Unless stated otherwise the origin
//! is the cage's optical axis, with the main rod pair at `y = -25`.
//! `assemble = true` returns the part oriented as mounted on the cage,
//! `false` lays it out for printing.
//!
//! Several offsets (`25`, `20`, `-20 - 10 - helper_block_y / 2`, ...) were
//! fitted on printed parts and are kept as measured.

use crate::base::{
    base, base_rods30, single_rod_clamp, CageConfig, DEFAULT_Z_LENGTH, RODS30_DIAG_THIRD_ROD,
    RODS30_DIST_THIRD_ROD, RODS30_SEP,
};
use crate::error::{CageError, Result};
use crate::helpers::rounded_plate;
use crate::strut::{strut_with_holes, DEFAULT_HOLE_DIAM};
use holmos::{centered_cube, centered_cylinder, Part};
use tracing::debug;

/// Raspberry Pi mounting hole separation across the board.
pub const RPI_HOLE_SEP_X: f64 = 49.0;
/// Raspberry Pi mounting hole separation along the board.
pub const RPI_HOLE_SEP_Z: f64 = 58.0;

/// Default screw hole diameter of the Raspberry Pi mount.
pub const DEFAULT_RPI_HOLE_DIAM: f64 = DEFAULT_HOLE_DIAM;
/// Default clamp length for [`board_hook`].
pub const DEFAULT_HOOK_CLIP_Z: f64 = 30.0;
/// Default hook opening (board thickness plus play).
pub const DEFAULT_HOOK_OPENING: f64 = 18.0;
/// Default outer diameter of [`cage_circumference`] (fits a 3" tube).
pub const DEFAULT_CIRCUMFERENCE_D_OUTER: f64 = 80.5;
/// Default wall thickness of [`cage_circumference`].
pub const DEFAULT_CIRCUMFERENCE_WALL: f64 = 2.0;
/// Default height of [`cage_circumference`].
pub const DEFAULT_CIRCUMFERENCE_H: f64 = 10.0;

/// Angle in degrees between a diagonal strut and the long side of a
/// `sep_x` × `sep_z` rectangle.
///
/// Below 45° whenever `sep_x < sep_z`. A zero `sep_z` yields 90° or NaN
/// rather than an error.
pub fn strut_angle_deg(sep_x: f64, sep_z: f64) -> f64 {
    (sep_x / sep_z).atan().to_degrees()
}

/// Length of the diagonal of an `a` × `b` rectangle.
pub fn diagonal(a: f64, b: f64) -> f64 {
    (a * a + b * b).sqrt()
}

/// X-brace of two copies of `strut`, rotated by `±angle_deg` about z.
fn x_brace(strut: &Part, angle_deg: f64) -> Part {
    strut.rotate_z(-angle_deg) + strut.rotate_z(angle_deg)
}

/// Place `part` on a circle of `radius` around the z axis at `angle_deg`.
pub fn on_circle(part: &Part, angle_deg: f64, radius: f64) -> Part {
    part.translate(radius, 0.0, 0.0).rotate_z(angle_deg)
}

/// Mount for a Raspberry Pi 3B+ on four screws, clipped to the side of the
/// cage between a main rod and the third rod.
///
/// The board lies in the optical XZ plane; the plate is printed flat. The
/// flat layout also carries four spacers to put between board and plate.
pub fn rpi_mount(cfg: &CageConfig, assemble: bool, hole_diam: f64) -> Part {
    let strut_width = 10.0;
    let strut_thick = 3.0;

    let hole_diagonal = diagonal(RPI_HOLE_SEP_X, RPI_HOLE_SEP_Z);
    let strut_angle = strut_angle_deg(RPI_HOLE_SEP_X, RPI_HOLE_SEP_Z);

    let diag_strut = strut_with_holes(hole_diagonal, strut_thick, strut_width, hole_diam);
    let mut cross = x_brace(&diag_strut, strut_angle).translate(0.0, 0.0, strut_thick / 2.0);

    // from optical-axis coordinates to plate coordinates
    let mount_strut = base(cfg, RODS30_DIAG_THIRD_ROD, DEFAULT_Z_LENGTH)
        .translate(0.0, 20.0, 0.0)
        .rotate(-90.0, 0.0, 0.0);
    cross += mount_strut.translate(0.0, RPI_HOLE_SEP_Z / 2.0 - strut_width, 0.0);
    cross += mount_strut.translate(0.0, -RPI_HOLE_SEP_Z / 2.0 + strut_width, 0.0);

    let part = if assemble {
        cross
            .rotate(90.0, 0.0, -90.0)
            .translate(20.0, -RODS30_DIAG_THIRD_ROD / 2.0 - 25.0, 0.0)
    } else {
        let spacer_height = 5.0;
        let spacer = centered_cylinder("spacer", hole_diam, spacer_height, 0)
            - centered_cylinder("spacer_bore", 0.6 * hole_diam, spacer_height + 1.0, 0);
        for x in [
            15.0,
            15.0 + 2.5 * hole_diam,
            -15.0,
            -15.0 - 2.5 * hole_diam,
        ] {
            cross += spacer.translate(x, 0.0, spacer_height / 2.0);
        }
        cross
    };
    part.named("rpi_mount")
}

/// Clip pair for the main rods.
///
/// `inside` flips the clamps so they grip the rods from the inside of the
/// cage; the rods stay at `y = -25`.
pub fn cage_clip_pair(cfg: &CageConfig, z_length: f64, inside: bool) -> Part {
    let clip_pair = base(cfg, RODS30_SEP, z_length);
    if inside {
        // mirrored clips sit at y=25 and are moved back
        clip_pair.mirror_y().translate(0.0, -50.0, 0.0)
    } else {
        clip_pair
    }
}

/// Three clips at the cage's rod positions, aligned to the optical axis at
/// (0, 0) and centered in z.
pub fn cage_3_clips(cfg: &CageConfig, z_length: f64, inside: bool) -> Part {
    // main pair is at y=-25
    let third_rod_y = RODS30_DIST_THIRD_ROD - 25.0;

    let mut single_clip = single_rod_clamp(z_length);
    if inside {
        single_clip = single_clip.mirror_y();
    }
    let single_clip = single_clip.rotate_z(180.0).translate(0.0, third_rod_y, 0.0);

    (cage_clip_pair(cfg, z_length, inside) + single_clip).named("cage_3_clips")
}

/// Trapezoid outline shared by the stabilizer and the base plate: a block
/// from `y = 5` to `y = base_y - 5` with both sides cut back along the
/// cage's tapering rod layout.
fn trapezoid(cage_base: f64, base_y: f64, height: f64) -> Part {
    let angle = -(cage_base / 2.0 / base_y).atan().to_degrees();

    let block = centered_cube("trapezoid", cage_base + 4.0, base_y - 10.0, height).translate(
        0.0,
        base_y / 2.0,
        0.0,
    );
    let cut = centered_cube("side_cut", cage_base, base_y, 2.0 * height);

    block
        - cut.rotate_z(angle).translate(-cage_base, base_y / 2.0, 0.0)
        - cut.rotate_z(-angle).translate(cage_base, base_y / 2.0, 0.0)
}

/// Stabilizer plate clipped to all three rods, with a bore for the optical
/// path.
///
/// Printed as mounted, so `_assemble` does not change the geometry.
pub fn cage_stabilizer(cfg: &CageConfig, _assemble: bool) -> Part {
    let cage_base = 30.0;
    let stabilizer_height = 10.0;

    let mut stabilizer =
        trapezoid(cage_base, RODS30_DIST_THIRD_ROD, stabilizer_height).translate(0.0, -25.0, 0.0);

    for (dd, y) in [(25.0, 0.0), (10.0, 21.0)] {
        stabilizer -= centered_cylinder("bore", dd / 2.0, 20.0, 0).translate(0.0, y, 0.0);
    }

    stabilizer += cage_3_clips(cfg, DEFAULT_Z_LENGTH, false);
    stabilizer.named("cage_stabilizer")
}

/// Side stabilizer: X-brace between two rod-pair clamps `100` apart, one
/// on each side of the cage.
pub fn cage_side_stabilizer() -> Part {
    let sep_z = 100.0;
    let sep_x = RODS30_DIAG_THIRD_ROD;

    let strut_width = 10.0;
    let strut_thick = 3.0;

    let diag_len = diagonal(sep_x, sep_z);
    let strut_angle = strut_angle_deg(sep_x, sep_z);

    let diag_strut = rounded_plate(
        [strut_width, diag_len + strut_width, strut_thick],
        strut_width / 2.0,
    );
    // to z = 0 ... -thick
    let mut cross = x_brace(&diag_strut, strut_angle).translate(0.0, 0.0, -strut_thick / 2.0);

    let mut mount_strut = centered_cube("mount_strut", sep_x, strut_width, strut_thick).translate(
        0.0,
        0.0,
        -strut_thick / 2.0,
    );
    // from optical-axis coordinates to brace coordinates
    mount_strut += base_rods30(sep_x, DEFAULT_Z_LENGTH)
        .translate(0.0, 20.0, 0.0)
        .rotate(-90.0, 0.0, 0.0);

    cross += mount_strut.translate(0.0, sep_z / 2.0, 0.0);
    cross += mount_strut.translate(0.0, -sep_z / 2.0, 0.0);
    cross.named("cage_side_stabilizer")
}

/// Base plate with three clamps, two counterbored mounting holes and two
/// cross struts for screwing the cage onto a board.
///
/// The mounting holes are holes of the whole part: they also cut the struts
/// and clamps. Printed as mounted, so `_assemble` does not change the
/// geometry.
pub fn cage_base_plate(cfg: &CageConfig, _assemble: bool) -> Part {
    let cage_base = 30.0;
    let stabilizer_base = 60.0;
    let stabilizer_height = 10.0;

    let mut plate = trapezoid(cage_base, stabilizer_base, stabilizer_height);

    for y in [15.0, 40.0] {
        plate += centered_cylinder("counterbore", 12.0 / 2.0, 10.0, 0)
            .translate(0.0, y, 5.0)
            .hole();
        plate += centered_cylinder("through_hole", 7.5 / 2.0, 2.0 * 10.0, 0)
            .translate(0.0, y, -5.0)
            .hole();
    }

    let strut_thick = 3.0;
    let strut = strut_with_holes(40.0, strut_thick, 10.0, DEFAULT_HOLE_DIAM);
    for y in [10.0, stabilizer_base - 5.0] {
        plate += strut
            .rotate_z(90.0)
            .translate(0.0, y, (strut_thick - 10.0) / 2.0);
    }

    let mut plate = plate.translate(0.0, -25.0, 0.0);
    plate += cage_3_clips(cfg, 30.0, false).translate(0.0, 0.0, 10.0);
    plate.named("cage_base_plate")
}

/// Hook for the top end of the cage, to hang the setup from a door,
/// whiteboard, poster board or cabinet.
///
/// Rod clamps start at z=0. Only fits the rod-mount cage.
pub fn board_hook(
    cfg: &CageConfig,
    clip_z: f64,
    hook_opening: f64,
    assemble: bool,
) -> Result<Part> {
    if !cfg.is_rod_mount() {
        debug!(mount = ?cfg.mount, "board hook needs rod clamps");
        return Err(CageError::RodMountRequired(cfg.mount));
    }

    // start at z=0
    let rod_clips = base_rods30(RODS30_SEP, clip_z).translate(0.0, 0.0, clip_z / 2.0);

    let hook_thick = 4.0;
    let hook_width = 30.0;
    let hook_z = 35.0;
    let strut_height = 10.0;

    let hook = centered_cube("hook", hook_width, hook_thick, hook_z)
        .translate(0.0, hook_opening - 20.0 + hook_thick / 2.0, 0.0)
        .translate(0.0, 0.0, hook_z / 2.0);

    let strut = centered_cube("hook_strut", hook_thick, hook_opening + 0.1, strut_height).translate(
        hook_width / 2.0 - hook_thick,
        (hook_opening - 40.0) / 2.0,
        strut_height / 2.0,
    );
    let strut = &strut + &strut.mirror_x();

    let assembly = rod_clips + hook + strut;
    let part = if assemble {
        assembly.rotate(0.0, 180.0, 180.0).translate(0.0, -50.0, 0.0)
    } else {
        assembly
    };
    Ok(part.named("board_hook"))
}

/// Ring fitting the cage ends, e.g. to transport the cage inside a
/// cylindrical tube. Bottom at z=0.
///
/// The clips grip the rods from the inside; four bosses take screws to
/// fix the cage onto something. `_assemble` does not change the geometry.
pub fn cage_circumference(
    cfg: &CageConfig,
    d_outer: f64,
    wall_thick: f64,
    h: f64,
    _assemble: bool,
) -> Part {
    // absolute diameter: contact to clips
    let d_inner = RODS30_DIST_THIRD_ROD + 7.0;

    // bottom at z=0
    let clamp = cage_3_clips(cfg, DEFAULT_Z_LENGTH, true).translate(0.0, 0.0, 5.0);

    let circ_x_at_clamp = ((d_outer / 2.0).powi(2) - 30.0_f64.powi(2)).sqrt();
    let back_face = centered_cube("back_face", 2.0 * circ_x_at_clamp, wall_thick, h).translate(
        0.0,
        -30.0 + wall_thick / 2.0,
        h / 2.0,
    );

    let mut circle = Part::cylinder("circumference", d_outer / 2.0, h, 0);
    // relative diameter: wall thickness
    circle -= Part::cylinder("inner", (d_outer - 2.0 * wall_thick) / 2.0, 2.0 * h, 0).translate(
        0.0,
        0.0,
        wall_thick,
    );
    circle -= Part::cylinder("opening", d_inner / 2.0, 2.0 * h, 0).translate(0.0, 0.0, -2.0);

    // clear space past -y of the clamps, so the cage can rest against a wall
    // when used with the hook
    let helper_block_y = 30.0;
    circle -= centered_cube("clearance", 100.0, helper_block_y, 100.0).translate(
        0.0,
        -20.0 - 10.0 - helper_block_y / 2.0,
        0.0,
    );

    let boss = Part::cylinder("screw_boss", 8.0 / 2.0, wall_thick, 0);
    let screw = centered_cylinder("screw_hole", 3.2 / 2.0, 2.0 * h, 0);
    for angle_deg in [-30.0, 30.0, 150.0, 210.0] {
        circle += on_circle(&boss, angle_deg, d_inner / 2.0);
        circle -= on_circle(&screw, angle_deg, d_inner / 2.0);
    }

    (clamp + circle + back_face).named("cage_circumference")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{MountKind, CLAMP_FOOT, CLAMP_WALL, ROD_DIAMETER};
    use approx::assert_relative_eq;
    use holmos_ir::CsgOp;

    #[test]
    fn strut_angle_stays_below_45_degrees() {
        for sep_z in [1.0, 10.0, 58.0, 100.0, 1000.0] {
            for frac in [0.001, 0.1, 0.5, 0.9, 0.999] {
                let angle = strut_angle_deg(frac * sep_z, sep_z);
                assert!(angle > 0.0 && angle < 45.0, "angle {angle} for {frac}*{sep_z}");
            }
        }
        assert_relative_eq!(
            strut_angle_deg(RPI_HOLE_SEP_X, RPI_HOLE_SEP_Z),
            40.19205,
            epsilon = 1e-4
        );
        assert_relative_eq!(strut_angle_deg(1.0, 1.0), 45.0, epsilon = 1e-12);
    }

    #[test]
    fn diagonal_is_pythagorean() {
        assert_relative_eq!(diagonal(3.0, 4.0), 5.0);
        assert_relative_eq!(
            diagonal(RPI_HOLE_SEP_X, RPI_HOLE_SEP_Z),
            75.928,
            epsilon = 1e-3
        );
    }

    #[test]
    fn degenerate_separation_does_not_panic() {
        assert!(strut_angle_deg(0.0, 0.0).is_nan());
        let text = on_circle(&centered_cube("c", 1.0, 1.0, 1.0), f64::NAN, 1.0).to_scad("");
        assert!(text.contains("NaN"));
    }

    #[test]
    fn inside_clips_mirror_about_main_rods() {
        let cfg = CageConfig::default();
        let outside = cage_clip_pair(&cfg, 10.0, false).bounding_box().unwrap();
        let inside = cage_clip_pair(&cfg, 10.0, true).bounding_box().unwrap();

        // y -> -50 - y
        assert_relative_eq!(inside.min.y, -50.0 - outside.max.y, epsilon = 1e-9);
        assert_relative_eq!(inside.max.y, -50.0 - outside.min.y, epsilon = 1e-9);
        assert_relative_eq!(outside.min.y, -30.0, epsilon = 1e-9);
        assert_relative_eq!(inside.max.y, -20.0, epsilon = 1e-9);
        assert_relative_eq!(inside.min.x, outside.min.x, epsilon = 1e-9);
    }

    #[test]
    fn inside_three_clips_flip_every_clamp() {
        let cfg = CageConfig::default();
        let pair = cage_clip_pair(&cfg, 10.0, false).bounding_box().unwrap();
        let outside = cage_3_clips(&cfg, 10.0, false).bounding_box().unwrap();
        let inside = cage_3_clips(&cfg, 10.0, true).bounding_box().unwrap();
        let third_rod_y = RODS30_DIST_THIRD_ROD - 25.0;
        let outer_r = ROD_DIAMETER / 2.0 + CLAMP_WALL;

        // main pair: y -> -50 - y
        assert_relative_eq!(inside.min.y, -50.0 - pair.max.y, epsilon = 1e-9);
        // third clamp: foot turns from outwards to towards the axis
        assert_relative_eq!(outside.max.y, third_rod_y + CLAMP_FOOT, epsilon = 1e-9);
        assert_relative_eq!(inside.max.y, third_rod_y + outer_r, epsilon = 1e-9);
        assert_relative_eq!(inside.min.x, outside.min.x, epsilon = 1e-9);
        assert_relative_eq!(inside.max.x, outside.max.x, epsilon = 1e-9);
    }

    #[test]
    fn third_clip_sits_on_third_rod() {
        let cfg = CageConfig::default();
        let bb = cage_3_clips(&cfg, 10.0, false).bounding_box().unwrap();
        let third_rod_y = RODS30_DIST_THIRD_ROD - 25.0;
        // rotated clamp: ring towards the axis, foot outwards
        assert_relative_eq!(bb.max.y, third_rod_y + 5.0, epsilon = 1e-9);
        assert_relative_eq!(bb.min.y, -30.0, epsilon = 1e-9);
    }

    fn hole_cylinders(part: &Part) -> Vec<(f64, f64)> {
        let doc = part.to_document();
        let root = doc.roots[0].root;
        let mut found = Vec::new();
        for id in doc.descendants(root) {
            let CsgOp::Hole { child } = doc.nodes[&id].op else {
                continue;
            };
            let CsgOp::Translate { child, offset } = &doc.nodes[&child].op else {
                panic!("hole without placement");
            };
            let CsgOp::Cylinder { radius, .. } = doc.nodes[child].op else {
                panic!("hole is not a cylinder");
            };
            found.push((2.0 * radius, offset.y));
        }
        found.sort_by(|a, b| a.partial_cmp(b).unwrap());
        found
    }

    #[test]
    fn base_plate_has_two_counterbored_holes() {
        let cfg = CageConfig::default();
        for assemble in [false, true] {
            let holes = hole_cylinders(&cage_base_plate(&cfg, assemble));
            assert_eq!(
                holes,
                vec![(7.5, 15.0), (7.5, 40.0), (12.0, 15.0), (12.0, 40.0)]
            );
        }
    }

    #[test]
    fn base_plate_holes_cut_whole_part() {
        let text = cage_base_plate(&CageConfig::default(), false).to_scad("");
        assert!(text.starts_with("difference() {\n    union() {"));
        assert_eq!(text.matches("r = 6, center = true").count(), 2);
        assert_eq!(text.matches("r = 3.75, center = true").count(), 2);
    }

    #[test]
    fn board_hook_requires_rod_mount() {
        let err = board_hook(
            &CageConfig::threads20(),
            DEFAULT_HOOK_CLIP_Z,
            DEFAULT_HOOK_OPENING,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CageError::RodMountRequired(MountKind::Threads20)));

        let hook = board_hook(
            &CageConfig::rods30(),
            DEFAULT_HOOK_CLIP_Z,
            DEFAULT_HOOK_OPENING,
            false,
        )
        .unwrap();
        let bb = hook.bounding_box().unwrap();
        assert_relative_eq!(bb.min.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.z, 35.0, epsilon = 1e-9);
    }

    #[test]
    fn assembled_board_hook_hangs_down() {
        let hook = board_hook(&CageConfig::rods30(), 30.0, 18.0, true).unwrap();
        let bb = hook.bounding_box().unwrap();
        assert_relative_eq!(bb.max.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bb.min.z, -35.0, epsilon = 1e-9);
    }

    #[test]
    fn rpi_mount_flat_layout_has_spacers() {
        let cfg = CageConfig::default();
        let flat = rpi_mount(&cfg, false, 3.0).to_scad("");
        for x in ["15", "22.5", "-15", "-22.5"] {
            assert!(flat.contains(&format!("translate(v = [{x}, 0, 2.5])")), "spacer at {x}");
        }
        let assembled = rpi_mount(&cfg, true, 3.0).to_scad("");
        assert!(!assembled.contains("translate(v = [22.5, 0, 2.5])"));
        assert!(assembled.starts_with("translate(v = [20, -53.0968"));
    }

    #[test]
    fn builders_are_idempotent() {
        let cfg = CageConfig::default();
        assert_eq!(
            rpi_mount(&cfg, false, DEFAULT_RPI_HOLE_DIAM).to_scad("$fa = 5;"),
            rpi_mount(&cfg, false, DEFAULT_RPI_HOLE_DIAM).to_scad("$fa = 5;")
        );
        assert_eq!(
            cage_circumference(&cfg, 80.5, 2.0, 10.0, false).to_scad(""),
            cage_circumference(&cfg, 80.5, 2.0, 10.0, false).to_scad("")
        );
    }

    #[test]
    fn stabilizer_has_optical_bores() {
        let text = cage_stabilizer(&CageConfig::default(), false).to_scad("");
        assert!(text.contains("cylinder(h = 20, r = 12.5, center = true);"));
        assert!(text.contains("translate(v = [0, 21, 0])"));
    }

    #[test]
    fn side_stabilizer_is_symmetric() {
        let bb = cage_side_stabilizer().bounding_box().unwrap();
        assert_relative_eq!(bb.min.y, -bb.max.y, epsilon = 1e-6);
        assert_relative_eq!(bb.min.x, -bb.max.x, epsilon = 1e-6);
    }

    #[test]
    fn circumference_rests_on_z0() {
        let part = cage_circumference(
            &CageConfig::default(),
            DEFAULT_CIRCUMFERENCE_D_OUTER,
            DEFAULT_CIRCUMFERENCE_WALL,
            DEFAULT_CIRCUMFERENCE_H,
            true,
        );
        let bb = part.bounding_box().unwrap();
        assert_relative_eq!(bb.min.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.z, 10.0, epsilon = 1e-9);
        let text = part.to_scad("");
        for angle in ["-30", "30", "150", "210"] {
            assert!(text.contains(&format!("rotate(a = [0, 0, {angle}])")));
        }
    }
}

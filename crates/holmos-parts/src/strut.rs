//! Flat struts with screw holes at both ends.

use crate::helpers::rounded_plate;
use holmos::{centered_cylinder, Part};

/// Default screw hole diameter.
pub const DEFAULT_HOLE_DIAM: f64 = 3.0;

/// Rounded strut along y with through holes at `y = ±hole_dist / 2`.
///
/// The strut is `strut_width` wide and `strut_thick` thick, centered on the
/// origin, and overhangs each hole by half its width.
pub fn strut_with_holes(hole_dist: f64, strut_thick: f64, strut_width: f64, hole_diam: f64) -> Part {
    let plate = rounded_plate(
        [strut_width, hole_dist + strut_width, strut_thick],
        strut_width / 2.0,
    );
    let hole = centered_cylinder("screw_hole", hole_diam / 2.0, strut_thick + 1.0, 0);

    (plate
        - hole.translate(0.0, hole_dist / 2.0, 0.0)
        - hole.translate(0.0, -hole_dist / 2.0, 0.0))
    .named("strut")
}

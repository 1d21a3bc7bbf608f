//! Small shape helpers.

use holmos::{centered_cube, centered_cylinder, Part};

/// Plate centered on the origin with rounded vertical edges.
///
/// `size` is `[x, y, z]`; the four edges parallel to z get `radius`.
pub fn rounded_plate(size: [f64; 3], radius: f64) -> Part {
    let [x, y, z] = size;
    let (cx, cy) = (x / 2.0 - radius, y / 2.0 - radius);

    let mut plate = Part::empty("rounded_plate");
    if y > 2.0 * radius {
        plate += centered_cube("rounded_plate", x, y - 2.0 * radius, z);
    }
    if x > 2.0 * radius {
        plate += centered_cube("rounded_plate", x - 2.0 * radius, y, z);
    }
    let corner = centered_cylinder("corner", radius, z, 0);
    for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
        plate += corner.translate(sx * cx, sy * cy, 0.0);
    }
    plate
}

//! Analytic bounding boxes over the IR.
//!
//! Boxes are computed straight from the CSG tree, without meshing. Rotations
//! and mirrors map the eight corners of the child box, so nested rotations
//! grow the box but never shrink it below the true extent.

use holmos_ir::{CsgOp, Node, NodeId, Vec3 as IrVec3};
use nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use std::collections::HashMap;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// Create a box from two corners.
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Edge lengths along X, Y and Z.
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Center point.
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Smallest box containing both boxes.
    pub fn merge(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Overlap of both boxes, `None` if they are disjoint.
    pub fn intersect(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let min = self.min.sup(&other.min);
        let max = self.max.inf(&other.max);
        (min.x <= max.x && min.y <= max.y && min.z <= max.z).then(|| BoundingBox { min, max })
    }

    /// The eight corner points.
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(a.x, b.y, b.z),
            Point3::new(b.x, b.y, b.z),
        ]
    }

    /// Box around this box after applying the linear map `m`.
    pub fn transformed(&self, m: &Matrix3<f64>) -> BoundingBox {
        let mut pts = self.corners().into_iter().map(|p| Point3::from(m * p.coords));
        // corners() always yields 8 points
        let first = pts.next().unwrap_or(self.min);
        pts.fold(BoundingBox::new(first, first), |bb, p| BoundingBox {
            min: bb.min.inf(&p),
            max: bb.max.sup(&p),
        })
    }

    /// Box shifted by `offset`.
    pub fn translated(&self, offset: &Vector3<f64>) -> BoundingBox {
        BoundingBox {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

fn vec(v: &IrVec3) -> Vector3<f64> {
    Vector3::new(v.x, v.y, v.z)
}

/// Rotation matrix for Euler angles in degrees, applied X, then Y, then Z.
pub fn rotation_matrix(angles: &IrVec3) -> Matrix3<f64> {
    Rotation3::from_euler_angles(
        angles.x.to_radians(),
        angles.y.to_radians(),
        angles.z.to_radians(),
    )
    .into_inner()
}

/// Reflection matrix for the plane through the origin with normal `normal`.
///
/// A zero normal is the identity, matching OpenSCAD's `mirror([0, 0, 0])`.
pub fn mirror_matrix(normal: &IrVec3) -> Matrix3<f64> {
    let n = vec(normal);
    let len_sq = n.norm_squared();
    if len_sq == 0.0 {
        return Matrix3::identity();
    }
    Matrix3::identity() - (n * n.transpose()) * (2.0 / len_sq)
}

fn centered_span(extent: f64, center: bool) -> (f64, f64) {
    if center {
        (-extent / 2.0, extent / 2.0)
    } else {
        (0.0, extent)
    }
}

fn round_box(radius: f64, height: f64, center: bool) -> BoundingBox {
    let (z0, z1) = centered_span(height, center);
    BoundingBox::new(
        Point3::new(-radius, -radius, z0),
        Point3::new(radius, radius, z1),
    )
}

/// Bounding box of the subtree rooted at `id`.
pub(crate) fn of_node(nodes: &HashMap<NodeId, Node>, id: NodeId) -> Option<BoundingBox> {
    let node = nodes.get(&id)?;
    match &node.op {
        CsgOp::Cube { size, center } => {
            let (x0, x1) = centered_span(size.x, *center);
            let (y0, y1) = centered_span(size.y, *center);
            let (z0, z1) = centered_span(size.z, *center);
            Some(BoundingBox::new(
                Point3::new(x0, y0, z0),
                Point3::new(x1, y1, z1),
            ))
        }
        CsgOp::Cylinder {
            radius,
            height,
            center,
            ..
        } => Some(round_box(*radius, *height, *center)),
        CsgOp::Cone {
            radius_bottom,
            radius_top,
            height,
            center,
            ..
        } => Some(round_box(radius_bottom.max(*radius_top), *height, *center)),
        CsgOp::Sphere { radius, .. } => Some(BoundingBox::new(
            Point3::new(-radius, -radius, -radius),
            Point3::new(*radius, *radius, *radius),
        )),
        CsgOp::Empty | CsgOp::Hole { .. } => None,
        CsgOp::Union { left, right } => match (of_node(nodes, *left), of_node(nodes, *right)) {
            (Some(a), Some(b)) => Some(a.merge(&b)),
            (a, b) => a.or(b),
        },
        CsgOp::Difference { left, .. } => of_node(nodes, *left),
        CsgOp::Intersection { left, right } => {
            let a = of_node(nodes, *left)?;
            let b = of_node(nodes, *right)?;
            a.intersect(&b)
        }
        CsgOp::Translate { child, offset } => {
            of_node(nodes, *child).map(|bb| bb.translated(&vec(offset)))
        }
        CsgOp::Rotate { child, angles } => {
            of_node(nodes, *child).map(|bb| bb.transformed(&rotation_matrix(angles)))
        }
        CsgOp::Mirror { child, normal } => {
            of_node(nodes, *child).map(|bb| bb.transformed(&mirror_matrix(normal)))
        }
        CsgOp::HoleScope { child } => of_node(nodes, *child),
    }
}

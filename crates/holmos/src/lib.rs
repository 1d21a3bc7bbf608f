#![warn(missing_docs)]

//! holmos: parametric CSG modeling for 3D-printed cage parts
//!
//! Parts are built from cubes, cylinders and spheres with boolean and rigid
//! transform operations and exported as OpenSCAD `.scad` text.
//!
//! # Example
//!
//! ```rust,no_run
//! use holmos::{centered_cube, centered_cylinder};
//!
//! let block = centered_cube("block", 20.0, 10.0, 5.0);
//! let bore = centered_cylinder("bore", 3.0, 10.0, 0);
//! let result = block - bore;
//! result.write_scad("block_with_bore.scad", "$fn = 64;").unwrap();
//! ```

use holmos_ir::{CsgOp, Document, Node, NodeId, PartEntry, Vec3 as IrVec3};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

pub mod bounds;
pub mod export;

pub use bounds::BoundingBox;

/// Errors from writing parts.
#[derive(Error, Debug)]
pub enum CadError {
    /// The `.scad` file could not be written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Shared by all threads so parts built anywhere can be combined.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

fn alloc_node_id() -> NodeId {
    NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)
}

/// A named solid described by its CSG construction graph.
///
/// Start from primitives ([`Part::cube`], [`centered_cylinder`], ...) and
/// combine them with [`Part::union`], [`Part::difference`] and
/// [`Part::intersection`], or with `+`, `-`, `&`, `+=` and `-=`.
///
/// A part never changes after construction; every operation returns a new
/// part whose IR subtree shares no state with its inputs. Extract the tree
/// with [`Part::to_document`].
#[derive(Debug, Clone)]
pub struct Part {
    /// Human-readable name for this part (used in IR documents).
    pub name: String,
    ir_node_id: NodeId,
    ir_nodes: HashMap<NodeId, Node>,
}

impl Part {
    /// Record `op` as a new node on top of the merged graphs of `inputs`.
    fn record(name: String, op: CsgOp, inputs: &[&Part]) -> Self {
        let id = alloc_node_id();
        let mut ir_nodes = HashMap::new();
        for input in inputs {
            ir_nodes.extend(input.ir_nodes.iter().map(|(&k, v)| (k, v.clone())));
        }
        ir_nodes.insert(
            id,
            Node {
                id,
                name: Some(name.clone()),
                op,
            },
        );
        Self {
            name,
            ir_node_id: id,
            ir_nodes,
        }
    }

    fn leaf(name: impl Into<String>, op: CsgOp) -> Self {
        Self::record(name.into(), op, &[])
    }

    fn unary(&self, op_fn: impl FnOnce(NodeId) -> CsgOp) -> Self {
        Self::record(self.name.clone(), op_fn(self.ir_node_id), &[self])
    }

    fn binary(&self, other: &Part, op_fn: impl FnOnce(NodeId, NodeId) -> CsgOp) -> Self {
        let op = op_fn(self.ir_node_id, other.ir_node_id);
        Self::record(self.name.clone(), op, &[self, other])
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    /// A part with no material; the start value for accumulating unions.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::leaf(name, CsgOp::Empty)
    }

    /// Box spanning `[0, x] × [0, y] × [0, z]`.
    pub fn cube(name: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        let size = IrVec3::new(x, y, z);
        Self::leaf(name, CsgOp::Cube { size, center: false })
    }

    /// Cylinder on the z axis from z=0 to z=`height`.
    ///
    /// `segments == 0` leaves tessellation to the renderer's `$fa`/`$fs`.
    pub fn cylinder(name: impl Into<String>, radius: f64, height: f64, segments: u32) -> Self {
        Self::leaf(
            name,
            CsgOp::Cylinder {
                radius,
                height,
                center: false,
                segments,
            },
        )
    }

    /// Tapered cylinder from z=0 (`radius_bottom`) to z=`height` (`radius_top`).
    pub fn cone(
        name: impl Into<String>,
        radius_bottom: f64,
        radius_top: f64,
        height: f64,
        segments: u32,
    ) -> Self {
        Self::leaf(
            name,
            CsgOp::Cone {
                radius_bottom,
                radius_top,
                height,
                center: false,
                segments,
            },
        )
    }

    /// Sphere around the origin.
    pub fn sphere(name: impl Into<String>, radius: f64, segments: u32) -> Self {
        Self::leaf(name, CsgOp::Sphere { radius, segments })
    }

    // =========================================================================
    // Booleans and holes
    // =========================================================================

    /// `self` with `other` cut away.
    pub fn difference(&self, other: &Part) -> Self {
        self.binary(other, |left, right| CsgOp::Difference { left, right })
    }

    /// Material of both parts.
    pub fn union(&self, other: &Part) -> Self {
        self.binary(other, |left, right| CsgOp::Union { left, right })
    }

    /// Material common to both parts.
    pub fn intersection(&self, other: &Part) -> Self {
        self.binary(other, |left, right| CsgOp::Intersection { left, right })
    }

    /// Mark this part as a hole.
    ///
    /// A hole is subtracted from everything in its enclosing hole scope,
    /// including material unioned in after the hole was placed. The scope is
    /// the nearest [`Part::hole_scope`] ancestor, or the exported part.
    pub fn hole(&self) -> Self {
        self.unary(|child| CsgOp::Hole { child })
    }

    /// Stop holes inside this part from cutting anything outside it.
    pub fn hole_scope(&self) -> Self {
        self.unary(|child| CsgOp::HoleScope { child })
    }

    /// Rename the part.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    /// Move the part by `(x, y, z)`.
    pub fn translate(&self, x: f64, y: f64, z: f64) -> Self {
        self.unary(|child| CsgOp::Translate {
            child,
            offset: IrVec3::new(x, y, z),
        })
    }

    /// Rotate the part (angles in degrees, applied X, then Y, then Z).
    pub fn rotate(&self, x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        self.unary(|child| CsgOp::Rotate {
            child,
            angles: IrVec3::new(x_deg, y_deg, z_deg),
        })
    }

    /// Rotate about the Z axis (degrees).
    pub fn rotate_z(&self, deg: f64) -> Self {
        self.rotate(0.0, 0.0, deg)
    }

    /// Mirror through the plane through the origin with normal `(nx, ny, nz)`.
    pub fn mirror(&self, nx: f64, ny: f64, nz: f64) -> Self {
        self.unary(|child| CsgOp::Mirror {
            child,
            normal: IrVec3::new(nx, ny, nz),
        })
    }

    /// Negate x.
    pub fn mirror_x(&self) -> Part {
        self.mirror(1.0, 0.0, 0.0)
    }

    /// Negate y.
    pub fn mirror_y(&self) -> Part {
        self.mirror(0.0, 1.0, 0.0)
    }

    /// Negate z.
    pub fn mirror_z(&self) -> Part {
        self.mirror(0.0, 0.0, 1.0)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Axis-aligned bounding box of the solid material, if any.
    ///
    /// Computed from the IR without meshing. Differences keep the box of the
    /// base operand and holes contribute nothing, so the box may be larger
    /// than the final solid but never smaller.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        bounds::of_node(&self.ir_nodes, self.ir_node_id)
    }

    /// Check if the part contains no solid material.
    pub fn is_empty(&self) -> bool {
        self.bounding_box().is_none()
    }

    /// Number of IR nodes in this part's construction DAG.
    pub fn node_count(&self) -> usize {
        self.ir_nodes.len()
    }

    /// Render to `.scad` text (delegates to [`export::scad::to_scad`]).
    pub fn to_scad(&self, header: &str) -> String {
        export::scad::to_scad(self, header)
    }

    /// Write `.scad` text to a file (delegates to [`export::scad::export_scad`]).
    pub fn write_scad(
        &self,
        path: impl AsRef<std::path::Path>,
        header: &str,
    ) -> Result<(), CadError> {
        export::scad::export_scad(self, path, header)
    }

    /// The construction graph as a single-part [`Document`].
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.nodes = self.ir_nodes.clone();
        doc.roots.push(PartEntry {
            root: self.ir_node_id,
            name: self.name.clone(),
        });
        doc
    }
}

/// Box centered on the origin.
pub fn centered_cube(name: impl Into<String>, x: f64, y: f64, z: f64) -> Part {
    let size = IrVec3::new(x, y, z);
    Part::leaf(name, CsgOp::Cube { size, center: true })
}

/// Cylinder on the z axis, centered on the origin.
pub fn centered_cylinder(name: impl Into<String>, radius: f64, height: f64, segments: u32) -> Part {
    Part::leaf(
        name,
        CsgOp::Cylinder {
            radius,
            height,
            center: true,
            segments,
        },
    )
}

// =============================================================================
// Operators
// =============================================================================

/// Union: `&a + &b`
impl std::ops::Add for &Part {
    type Output = Part;
    fn add(self, rhs: &Part) -> Part {
        self.union(rhs)
    }
}

/// Union: `a + b`
impl std::ops::Add for Part {
    type Output = Part;
    fn add(self, rhs: Part) -> Part {
        self.union(&rhs)
    }
}

/// Difference: `&a - &b`
impl std::ops::Sub for &Part {
    type Output = Part;
    fn sub(self, rhs: &Part) -> Part {
        self.difference(rhs)
    }
}

/// Difference: `a - b`
impl std::ops::Sub for Part {
    type Output = Part;
    fn sub(self, rhs: Part) -> Part {
        self.difference(&rhs)
    }
}

/// Intersection: `&a & &b`
impl std::ops::BitAnd for &Part {
    type Output = Part;
    fn bitand(self, rhs: &Part) -> Part {
        self.intersection(rhs)
    }
}

/// Intersection: `a & b`
impl std::ops::BitAnd for Part {
    type Output = Part;
    fn bitand(self, rhs: Part) -> Part {
        self.intersection(&rhs)
    }
}

/// Accumulating union: `a += b`
impl std::ops::AddAssign for Part {
    fn add_assign(&mut self, rhs: Part) {
        *self = self.union(&rhs);
    }
}

/// Accumulating difference: `a -= b`
impl std::ops::SubAssign for Part {
    fn sub_assign(&mut self, rhs: Part) {
        *self = self.difference(&rhs);
    }
}

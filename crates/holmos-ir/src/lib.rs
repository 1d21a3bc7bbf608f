#![warn(missing_docs)]

//! Intermediate representation for HolMOS cage parts.
//!
//! This crate defines the DAG-based IR that records how a part was built
//! from primitives, booleans and rigid transforms.
//!
//! Nodes only describe operations; there is no mesh data. The `holmos` crate
//! renders the graph as `.scad` text and computes bounding boxes from it.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Node key, unique across every part built in one process.
pub type NodeId = u64;

/// Vector in millimeters, or angles in degrees for [`CsgOp::Rotate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Vector from its three components.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One step of a part's construction.
///
/// Leaves are primitives; every other variant refers to its operands by
/// [`NodeId`]. Serialized with a `type` tag, e.g. `{"type": "Cube", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CsgOp {
    /// Axis-aligned box. Corner at origin unless `center` is set.
    Cube {
        /// Edge lengths along x, y and z.
        size: Vec3,
        /// Center the box on the origin.
        center: bool,
    },
    /// Cylinder along the Z axis. Bottom at z=0 unless `center` is set.
    Cylinder {
        /// Radius of the circular cross section.
        radius: f64,
        /// Length along z.
        height: f64,
        /// Center the cylinder on the origin along Z.
        center: bool,
        /// Number of circular segments (0 = renderer default).
        segments: u32,
    },
    /// Cylinder whose radius changes linearly from bottom to top.
    Cone {
        /// Radius at the low end.
        radius_bottom: f64,
        /// Radius at the high end; 0 gives a point.
        radius_top: f64,
        /// Length along z.
        height: f64,
        /// Center the cone on the origin along Z.
        center: bool,
        /// Number of circular segments (0 = renderer default).
        segments: u32,
    },
    /// Sphere around the origin.
    Sphere {
        /// Radius of the sphere.
        radius: f64,
        /// Number of circular segments (0 = renderer default).
        segments: u32,
    },
    /// No material. Unioning with it changes nothing.
    Empty,
    /// Material of both operands.
    Union {
        /// First operand.
        left: NodeId,
        /// Second operand.
        right: NodeId,
    },
    /// `left` with `right` cut away.
    Difference {
        /// Material that is kept.
        left: NodeId,
        /// Material that is cut away.
        right: NodeId,
    },
    /// Material common to both operands.
    Intersection {
        /// First operand.
        left: NodeId,
        /// Second operand.
        right: NodeId,
    },
    /// `child` moved by `offset`.
    Translate {
        /// Moved subtree.
        child: NodeId,
        /// Shift in millimeters.
        offset: Vec3,
    },
    /// `child` rotated about x, then y, then z, by `angles` in degrees
    /// (OpenSCAD's `rotate(a = [x, y, z])`).
    Rotate {
        /// Rotated subtree.
        child: NodeId,
        /// Angles about x, y and z, in degrees.
        angles: Vec3,
    },
    /// `child` reflected in the plane through the origin with normal
    /// `normal`, which need not be unit length.
    Mirror {
        /// Reflected subtree.
        child: NodeId,
        /// Normal of the mirror plane.
        normal: Vec3,
    },
    /// Marks the child as a hole: it is subtracted from the enclosing
    /// [`CsgOp::HoleScope`] (or the document root) after everything else
    /// in that scope has been combined.
    Hole {
        /// Hole geometry.
        child: NodeId,
    },
    /// Boundary that holes inside `child` do not cross.
    HoleScope {
        /// Scoped subtree.
        child: NodeId,
    },
}

impl CsgOp {
    /// Child node ids in operand order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            CsgOp::Union { left, right }
            | CsgOp::Difference { left, right }
            | CsgOp::Intersection { left, right } => vec![*left, *right],
            CsgOp::Translate { child, .. }
            | CsgOp::Rotate { child, .. }
            | CsgOp::Mirror { child, .. }
            | CsgOp::Hole { child }
            | CsgOp::HoleScope { child } => vec![*child],
            CsgOp::Cube { .. }
            | CsgOp::Cylinder { .. }
            | CsgOp::Cone { .. }
            | CsgOp::Sphere { .. }
            | CsgOp::Empty => Vec::new(),
        }
    }
}

/// An operation and the id it is stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Same as the key in [`Document::nodes`].
    pub id: NodeId,
    /// Name of the part this node was built for.
    pub name: Option<String>,
    /// What this node computes from its children.
    pub op: CsgOp,
}

/// A finished part: a named root into the node graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartEntry {
    /// Node whose subtree is the finished part.
    pub root: NodeId,
    /// e.g. `"cage_base_plate"`
    pub name: String,
}

/// Serialized form of one or more parts, written as `<stem>.json` next to
/// the `.scad` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document format, currently `"0.1"`.
    pub version: String,
    /// Every node reachable from any entry in `roots`.
    pub nodes: HashMap<NodeId, Node>,
    /// Finished parts, in the order they were added.
    pub roots: Vec<PartEntry>,
}

const FORMAT_VERSION: &str = "0.1";

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Document with no nodes and no parts.
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            nodes: HashMap::new(),
            roots: Vec::new(),
        }
    }

    /// Ids of all nodes reachable from `root` (including `root`), depth first.
    ///
    /// Each id appears once, even when a subtree is shared by several
    /// parents.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(&id) {
                out.push(id);
                stack.extend(node.op.children().into_iter().rev());
            }
        }
        out
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a document written by [`Document::to_json`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

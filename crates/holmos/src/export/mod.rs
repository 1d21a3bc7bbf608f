//! Export formats.
//!
//! Only OpenSCAD text is produced; meshing and STL output are left to the
//! OpenSCAD toolchain that consumes the files.

pub mod scad;

pub use scad::{export_scad, to_scad};

//! OpenSCAD export.
//!
//! Writes a part's CSG tree as `.scad` source. The file starts with a
//! caller-supplied header (usually `$fa`/`$fs` quality directives),
//! followed by the body:
//!
//! ```text
//! $fa = 5;$fs = 0.1;
//!
//! difference() {
//!     union() {
//!         cube(size = [34, 50, 10], center = true);
//!         ...
//!     }
//!     translate(v = [0, 15, 5]) {
//!         cylinder(h = 10, r = 6, center = true);
//!     }
//! }
//! ```
//!
//! Holes are hoisted: inside each hole scope the solid material is rendered
//! first and every hole, wrapped in the transforms leading to it, is
//! subtracted at the end.

use crate::{CadError, Part};
use holmos_ir::{CsgOp, Node, NodeId, Vec3 as IrVec3};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const INDENT: &str = "    ";

/// A rendered statement as unindented lines.
type Block = Vec<String>;

/// Render a part to `.scad` text.
///
/// The header is emitted verbatim and separated from the body by a blank
/// line. A part without solid material yields only the header.
pub fn to_scad(part: &Part, header: &str) -> String {
    let body = ScadWriter::new(&part.ir_nodes).scope(part.ir_node_id);

    let mut out = String::new();
    if !header.is_empty() {
        out.push_str(header);
        out.push('\n');
    }
    if let Some(lines) = body {
        if !out.is_empty() {
            out.push('\n');
        }
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// Write a part to a `.scad` file, replacing any existing file.
pub fn export_scad(
    part: &Part,
    path: impl AsRef<Path>,
    header: &str,
) -> Result<(), CadError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(to_scad(part, header).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Format a number the way OpenSCAD reads it back.
fn num(v: f64) -> String {
    if v == 0.0 {
        // avoid "-0"
        "0".to_string()
    } else {
        format!("{v}")
    }
}

fn vector(v: &IrVec3) -> String {
    format!("[{}, {}, {}]", num(v.x), num(v.y), num(v.z))
}

fn fn_arg(segments: u32) -> String {
    if segments > 0 {
        format!(", $fn = {segments}")
    } else {
        String::new()
    }
}

fn block(head: String, items: Vec<Block>) -> Block {
    let mut lines = vec![format!("{head} {{")];
    for item in items {
        lines.extend(item.into_iter().map(|l| format!("{INDENT}{l}")));
    }
    lines.push("}".to_string());
    lines
}

fn transform_head(op: &CsgOp) -> Option<String> {
    match op {
        CsgOp::Translate { offset, .. } => Some(format!("translate(v = {})", vector(offset))),
        CsgOp::Rotate { angles, .. } => Some(format!("rotate(a = {})", vector(angles))),
        CsgOp::Mirror { normal, .. } => Some(format!("mirror(v = {})", vector(normal))),
        _ => None,
    }
}

struct ScadWriter<'a> {
    nodes: &'a HashMap<NodeId, Node>,
}

impl<'a> ScadWriter<'a> {
    fn new(nodes: &'a HashMap<NodeId, Node>) -> Self {
        Self { nodes }
    }

    fn op(&self, id: NodeId) -> Option<&'a CsgOp> {
        self.nodes.get(&id).map(|n| &n.op)
    }

    /// Render a hole scope: solid material minus every hole inside it.
    fn scope(&self, id: NodeId) -> Option<Block> {
        let body = self.body(id)?;
        let holes = self.holes(id);
        if holes.is_empty() {
            return Some(body);
        }
        let mut items = vec![body];
        items.extend(holes);
        Some(block("difference()".to_string(), items))
    }

    /// Render solid material only; holes are skipped.
    fn body(&self, id: NodeId) -> Option<Block> {
        let op = self.op(id)?;
        match op {
            CsgOp::Cube { size, center } => Some(vec![format!(
                "cube(size = {}, center = {center});",
                vector(size)
            )]),
            CsgOp::Cylinder {
                radius,
                height,
                center,
                segments,
            } => Some(vec![format!(
                "cylinder(h = {}, r = {}, center = {center}{});",
                num(*height),
                num(*radius),
                fn_arg(*segments)
            )]),
            CsgOp::Cone {
                radius_bottom,
                radius_top,
                height,
                center,
                segments,
            } => Some(vec![format!(
                "cylinder(h = {}, r1 = {}, r2 = {}, center = {center}{});",
                num(*height),
                num(*radius_bottom),
                num(*radius_top),
                fn_arg(*segments)
            )]),
            CsgOp::Sphere { radius, segments } => Some(vec![format!(
                "sphere(r = {}{});",
                num(*radius),
                fn_arg(*segments)
            )]),
            CsgOp::Empty | CsgOp::Hole { .. } => None,
            CsgOp::Union { .. } => {
                let mut operands = Vec::new();
                self.union_operands(id, &mut operands);
                let mut items: Vec<Block> =
                    operands.into_iter().filter_map(|o| self.body(o)).collect();
                match items.len() {
                    0 => None,
                    1 => items.pop(),
                    _ => Some(block("union()".to_string(), items)),
                }
            }
            CsgOp::Difference { left, right } => {
                let base = self.body(*left)?;
                match self.body(*right) {
                    Some(cut) => Some(block("difference()".to_string(), vec![base, cut])),
                    None => Some(base),
                }
            }
            CsgOp::Intersection { left, right } => {
                let a = self.body(*left)?;
                let b = self.body(*right)?;
                Some(block("intersection()".to_string(), vec![a, b]))
            }
            CsgOp::Translate { child, .. }
            | CsgOp::Rotate { child, .. }
            | CsgOp::Mirror { child, .. } => {
                let inner = self.body(*child)?;
                let head = transform_head(op)?;
                Some(block(head, vec![inner]))
            }
            CsgOp::HoleScope { child } => self.scope(*child),
        }
    }

    /// Flatten nested unions into one operand list.
    fn union_operands(&self, id: NodeId, out: &mut Vec<NodeId>) {
        match self.op(id) {
            Some(CsgOp::Union { left, right }) => {
                self.union_operands(*left, out);
                self.union_operands(*right, out);
            }
            Some(_) => out.push(id),
            None => {}
        }
    }

    /// Every hole below `id` that is not shielded by a nested scope, wrapped
    /// in the transforms between `id` and the hole.
    fn holes(&self, id: NodeId) -> Vec<Block> {
        let Some(op) = self.op(id) else {
            return Vec::new();
        };
        match op {
            CsgOp::Hole { child } => self.body(*child).into_iter().collect(),
            CsgOp::Union { left, right }
            | CsgOp::Difference { left, right }
            | CsgOp::Intersection { left, right } => {
                let mut out = self.holes(*left);
                out.extend(self.holes(*right));
                out
            }
            CsgOp::Translate { child, .. }
            | CsgOp::Rotate { child, .. }
            | CsgOp::Mirror { child, .. } => match transform_head(op) {
                Some(head) => self
                    .holes(*child)
                    .into_iter()
                    .map(|h| block(head.clone(), vec![h]))
                    .collect(),
                None => Vec::new(),
            },
            CsgOp::HoleScope { .. }
            | CsgOp::Cube { .. }
            | CsgOp::Cylinder { .. }
            | CsgOp::Cone { .. }
            | CsgOp::Sphere { .. }
            | CsgOp::Empty => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{centered_cube, centered_cylinder};

    fn balanced(text: &str) -> bool {
        let mut depth = 0i32;
        for c in text.chars() {
            match c {
                '{' | '(' | '[' => depth += 1,
                '}' | ')' | ']' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return false;
            }
        }
        depth == 0
    }

    #[test]
    fn header_comes_first() {
        let part = centered_cube("c", 1.0, 2.0, 3.0);
        let text = to_scad(&part, "$fa = 5;$fs = 0.1;");
        assert_eq!(
            text,
            "$fa = 5;$fs = 0.1;\n\ncube(size = [1, 2, 3], center = true);\n"
        );
    }

    #[test]
    fn empty_header_and_empty_part() {
        let part = Part::cylinder("c", 2.5, 10.0, 32);
        assert_eq!(
            to_scad(&part, ""),
            "cylinder(h = 10, r = 2.5, center = false, $fn = 32);\n"
        );
        assert_eq!(to_scad(&Part::empty("e"), "$fn = 8;"), "$fn = 8;\n");
    }

    #[test]
    fn nested_unions_flatten() {
        let a = centered_cube("a", 1.0, 1.0, 1.0);
        let part = &(&a + &a.translate(2.0, 0.0, 0.0)) + &a.translate(-2.0, 0.0, 0.0);
        let text = to_scad(&part, "");
        assert_eq!(text.matches("union()").count(), 1);
        assert_eq!(text.matches("cube(").count(), 3);
        assert!(text.contains("translate(v = [-2, 0, 0]) {"));
        assert!(balanced(&text));
    }

    #[test]
    fn holes_cut_material_added_later() {
        let plate = centered_cube("plate", 20.0, 20.0, 2.0);
        let bore = centered_cylinder("bore", 3.0, 10.0, 0)
            .translate(0.0, 5.0, 0.0)
            .hole();
        let boss = centered_cylinder("boss", 4.0, 6.0, 0).translate(0.0, 5.0, 3.0);
        let part = (plate + bore + boss).translate(0.0, 0.0, 1.0);

        let text = to_scad(&part, "");
        let expected = "\
difference() {
    translate(v = [0, 0, 1]) {
        union() {
            cube(size = [20, 20, 2], center = true);
            translate(v = [0, 5, 3]) {
                cylinder(h = 6, r = 4, center = true);
            }
        }
    }
    translate(v = [0, 0, 1]) {
        translate(v = [0, 5, 0]) {
            cylinder(h = 10, r = 3, center = true);
        }
    }
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn hole_scope_keeps_holes_local() {
        let inner = (centered_cube("a", 4.0, 4.0, 4.0)
            + centered_cylinder("h", 1.0, 10.0, 0).hole())
        .hole_scope();
        let outer = centered_cube("b", 4.0, 4.0, 4.0).translate(10.0, 0.0, 0.0);
        let text = to_scad(&(inner + outer), "");
        // the difference wraps only the scoped cube, not the whole part
        assert!(text.starts_with("union() {\n    difference() {"));
        assert!(balanced(&text));
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        let part = centered_cube("c", 1.0, 1.0, 1.0).translate(-0.0, 1.5, -2.0);
        assert!(to_scad(&part, "").contains("translate(v = [0, 1.5, -2])"));
    }

    #[test]
    fn export_writes_file() {
        let dir = std::env::temp_dir().join(format!("holmos-scad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cube.scad");
        let part = centered_cube("c", 1.0, 1.0, 1.0);
        export_scad(&part, &path, "$fa = 5;").unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("$fa = 5;"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let path = std::env::temp_dir()
            .join("holmos-no-such-dir")
            .join("deeper")
            .join("x.scad");
        let part = centered_cube("c", 1.0, 1.0, 1.0);
        assert!(matches!(
            export_scad(&part, &path, ""),
            Err(CadError::Io(_))
        ));
    }
}

//! Parent-child connector geometry and color

use super::viewport::Point;
use crate::core::models::{TreeNode, DEFAULT_COLOR};
use serde::Serialize;
use std::fmt;

/// Cubic Bézier from `start` to `end` through two control points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubicCurve {
    /// Curve start (parent position)
    pub start: Point,
    /// First control point
    pub control_a: Point,
    /// Second control point
    pub control_b: Point,
    /// Curve end (child position)
    pub end: Point,
}

impl CubicCurve {
    /// Horizontal link: both control points sit on the vertical line halfway
    /// between the endpoints, so the curve leaves and enters horizontally.
    #[must_use]
    pub fn horizontal(start: Point, end: Point) -> Self {
        let mid_x = (start.x + end.x) / 2.0;
        Self {
            start,
            control_a: Point::new(mid_x, start.y),
            control_b: Point::new(mid_x, end.y),
            end,
        }
    }
}

/// SVG path data (`M x,y C ...`)
impl fmt::Display for CubicCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M{},{}C{},{} {},{} {},{}",
            fmt_coord(self.start.x),
            fmt_coord(self.start.y),
            fmt_coord(self.control_a.x),
            fmt_coord(self.control_a.y),
            fmt_coord(self.control_b.x),
            fmt_coord(self.control_b.y),
            fmt_coord(self.end.x),
            fmt_coord(self.end.y),
        )
    }
}

/// Stroke color for the edge into `child`: the child's own color, else the
/// parent's, else the neutral default.
#[must_use]
pub fn edge_color<'a>(parent: &'a TreeNode, child: &'a TreeNode) -> &'a str {
    child
        .color
        .as_deref()
        .or(parent.color.as_deref())
        .unwrap_or(DEFAULT_COLOR)
}

/// Fill color for a node: its own color or the neutral default
#[must_use]
pub fn node_fill(node: &TreeNode) -> &str {
    node.color.as_deref().unwrap_or(DEFAULT_COLOR)
}

/// Round to two decimals and drop trailing zeros
pub(crate) fn fmt_coord(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid "-0"
    let rounded = if rounded.abs() < f64::EPSILON { 0.0 } else { rounded };
    format!("{rounded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::NodeKind;

    #[test]
    fn test_horizontal_control_points() {
        let curve = CubicCurve::horizontal(Point::new(0.0, 10.0), Point::new(100.0, 50.0));
        assert_eq!(curve.control_a, Point::new(50.0, 10.0));
        assert_eq!(curve.control_b, Point::new(50.0, 50.0));
        assert_eq!(curve.to_string(), "M0,10C50,10 50,50 100,50");
    }

    #[test]
    fn test_edge_color_fallback() {
        let plain = TreeNode::new("p", NodeKind::Root);
        let red = TreeNode::new("r", NodeKind::Category).with_color("#ff0000");
        let leaf = TreeNode::new("l", NodeKind::Annotation);

        assert_eq!(edge_color(&plain, &leaf), DEFAULT_COLOR);
        assert_eq!(edge_color(&red, &leaf), "#ff0000");
        assert_eq!(edge_color(&plain, &red), "#ff0000");
        assert_eq!(node_fill(&leaf), DEFAULT_COLOR);
    }

    #[test]
    fn test_fmt_coord() {
        assert_eq!(fmt_coord(1.0), "1");
        assert_eq!(fmt_coord(1.23456), "1.23");
        assert_eq!(fmt_coord(-0.001), "0");
    }
}

//! Tree layout engine
//!
//! Converts a validated [`TreeNode`] into positioned nodes and curved edges on
//! a canvas sized from the tree's breadth and depth. The tree grows left to
//! right: depth runs along `x`, siblings spread along `y`.
//!
//! ```
//! use mindmap_explorer::core::layout::Layout;
//! use mindmap_explorer::core::models::{NodeKind, TreeNode};
//!
//! let tree = TreeNode::new("X", NodeKind::Root)
//!     .with_child(TreeNode::new("A", NodeKind::Category));
//! let layout = Layout::compute(&tree, 1024.0, 768.0).unwrap();
//! assert_eq!(layout.nodes.len(), 2);
//! assert_eq!(layout.edges.len(), 1);
//! ```

pub mod edges;
pub mod tidy;
pub mod viewport;

pub use edges::{edge_color, node_fill, CubicCurve};
pub use tidy::{tidy_breadth, Separation};
pub use viewport::{DeviceClass, Point, ViewTransform, Viewport, ViewportPreset};

use crate::core::models::{NodeKind, TreeNode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunable layout parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Canvas height reserved per node
    pub row_unit: f64,
    /// Canvas width reserved per depth level
    pub level_unit: f64,
    /// Separation between adjacent nodes sharing a parent
    pub sibling_separation: f64,
    /// Separation between adjacent nodes with different parents
    pub cousin_separation: f64,
    /// Canvas height not used by the breadth axis
    pub breadth_padding: f64,
    /// Canvas width not used by the depth axis (room for leaf labels)
    pub depth_padding: f64,
    /// Viewports narrower than this are treated as mobile
    pub mobile_breakpoint: f64,
    /// Initial transform for mobile viewports
    pub mobile: ViewportPreset,
    /// Initial transform for desktop viewports
    pub desktop: ViewportPreset,
    /// Largest accepted tree
    pub max_nodes: usize,
    /// Largest accepted canvas extent on either axis
    pub max_canvas_extent: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_unit: 22.0,
            level_unit: 300.0,
            sibling_separation: 1.5,
            cousin_separation: 2.5,
            breadth_padding: 80.0,
            depth_padding: 350.0,
            mobile_breakpoint: 768.0,
            mobile: ViewportPreset::MOBILE,
            desktop: ViewportPreset::DESKTOP,
            max_nodes: 100_000,
            max_canvas_extent: 1_000_000.0,
        }
    }
}

impl LayoutConfig {
    /// Separation weights as used by the tidy placement
    #[must_use]
    pub const fn separation(&self) -> Separation {
        Separation {
            siblings: self.sibling_separation,
            cousins: self.cousin_separation,
        }
    }

    /// Device class for a viewport width
    #[must_use]
    pub fn device_for(&self, width: f64) -> DeviceClass {
        DeviceClass::for_width(width, self.mobile_breakpoint)
    }

    /// Initial transform preset for a device class
    #[must_use]
    pub const fn preset(&self, device: DeviceClass) -> &ViewportPreset {
        match device {
            DeviceClass::Mobile => &self.mobile,
            DeviceClass::Desktop => &self.desktop,
        }
    }

    /// Reject non-positive or non-finite tuning values.
    ///
    /// # Errors
    /// Returns [`LayoutError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = [
            ("row_unit", self.row_unit),
            ("level_unit", self.level_unit),
            ("sibling_separation", self.sibling_separation),
            ("cousin_separation", self.cousin_separation),
            ("max_canvas_extent", self.max_canvas_extent),
        ];
        let non_negative = [
            ("breadth_padding", self.breadth_padding),
            ("depth_padding", self.depth_padding),
            ("mobile_breakpoint", self.mobile_breakpoint),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::InvalidConfig { field, value });
            }
        }
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LayoutError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }
}

/// Tree too large to lay out, or a viewport that cannot hold one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutOverflowError {
    /// Viewport extents are negative or not finite
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport {
        /// Requested width
        width: f64,
        /// Requested height
        height: f64,
    },
    /// More nodes than the configured limit
    #[error("tree has {count} nodes, limit is {max}")]
    TooManyNodes {
        /// Node count of the rejected tree
        count: usize,
        /// Configured limit
        max: usize,
    },
    /// Canvas would exceed the configured extent
    #[error("canvas {width}x{height} exceeds the {max} limit")]
    CanvasTooLarge {
        /// Computed canvas width
        width: f64,
        /// Computed canvas height
        height: f64,
        /// Configured limit
        max: f64,
    },
}

/// Anything that stops a layout from being produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// The input tree violates its structural invariants
    #[error(transparent)]
    Malformed(#[from] crate::core::models::MalformedTreeError),
    /// Size limits exceeded
    #[error(transparent)]
    Overflow(#[from] LayoutOverflowError),
    /// A tuning parameter is out of range
    #[error("invalid layout setting {field} = {value}")]
    InvalidConfig {
        /// Offending field
        field: &'static str,
        /// Offending value
        value: f64,
    },
}

/// Drawing surface size in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

/// A positioned tree node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    /// Pre-order index; the root is `0`
    pub id: usize,
    /// Label
    pub name: String,
    /// Node kind
    pub kind: NodeKind,
    /// The node's own color, if any
    pub color: Option<String>,
    /// Effective fill color
    pub fill: String,
    /// World position
    pub position: Point,
    /// Distance from the root
    pub depth: usize,
    /// Whether the node has children
    pub has_children: bool,
    /// Parent id, `None` for the root
    pub parent: Option<usize>,
}

impl LayoutNode {
    /// Circle radius when not hovered
    #[must_use]
    pub const fn base_radius(&self) -> f64 {
        self.kind.base_radius()
    }
}

/// A parent-child connector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSpec {
    /// Parent node id
    pub source: usize,
    /// Child node id
    pub target: usize,
    /// Connector geometry in world units
    pub curve: CubicCurve,
    /// Stroke color
    pub color: String,
}

/// Immutable result of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Nodes in pre-order
    pub nodes: Vec<LayoutNode>,
    /// One edge per non-root node, in pre-order of the child
    pub edges: Vec<EdgeSpec>,
    /// Canvas size
    pub canvas: CanvasSize,
    /// Viewport the layout was computed for
    pub viewport: Viewport,
    /// Device class of that viewport
    pub device: DeviceClass,
    /// Transform to show on first render
    pub initial_transform: ViewTransform,
    /// Tree height (0 for a root-only tree)
    pub height: usize,
}

impl Layout {
    /// Lay out `root` for a `width` x `height` viewport with default settings.
    ///
    /// # Errors
    /// See [`compute_layout`].
    pub fn compute(root: &TreeNode, width: f64, height: f64) -> Result<Self, LayoutError> {
        compute_layout(root, Viewport::new(width, height), &LayoutConfig::default())
    }

    /// First node (pre-order) with the given name
    #[must_use]
    pub fn node_by_name(&self, name: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Topmost node whose circle of `radius` contains the world point.
    ///
    /// Nodes are painted in pre-order, so later nodes win ties.
    #[must_use]
    pub fn hit_test(&self, world: Point, radius: f64) -> Option<&LayoutNode> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.position.distance(world) <= radius)
    }
}

/// Pre-order flattening of a tree.
struct Flat<'a> {
    nodes: Vec<&'a TreeNode>,
    depth: Vec<usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

fn flatten(root: &TreeNode) -> Flat<'_> {
    let mut flat = Flat {
        nodes: Vec::new(),
        depth: Vec::new(),
        parent: Vec::new(),
        children: Vec::new(),
    };
    let mut stack = vec![(root, 0usize, None)];
    while let Some((node, depth, parent)) = stack.pop() {
        let id = flat.nodes.len();
        flat.nodes.push(node);
        flat.depth.push(depth);
        flat.parent.push(parent);
        flat.children.push(Vec::with_capacity(node.children.len()));
        if let Some(p) = parent {
            flat.children[p].push(id);
        }
        for child in node.children.iter().rev() {
            stack.push((child, depth + 1, Some(id)));
        }
    }
    flat
}

/// Lay out a validated tree.
///
/// The canvas is `max(viewport.width, height * level_unit)` wide and
/// `max(viewport.height, N * row_unit)` tall. Node breadth positions come
/// from tidy-tree placement scaled onto `canvas.height - breadth_padding`;
/// depth positions divide `canvas.width - depth_padding` evenly between
/// levels. Both extents are floored at one unit (`row_unit`, `level_unit`).
///
/// # Errors
/// Returns [`LayoutError`] for a malformed tree, an invalid viewport or
/// configuration, or a tree exceeding the configured size limits.
#[allow(clippy::cast_precision_loss)]
pub fn compute_layout(
    root: &TreeNode,
    viewport: Viewport,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    config.validate()?;
    if !viewport.is_valid() {
        return Err(LayoutOverflowError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        }
        .into());
    }
    root.validate()?;

    let flat = flatten(root);
    let count = flat.nodes.len();
    if count > config.max_nodes {
        return Err(LayoutOverflowError::TooManyNodes {
            count,
            max: config.max_nodes,
        }
        .into());
    }
    let height = flat.depth.iter().copied().max().unwrap_or(0);

    let canvas = CanvasSize {
        width: viewport.width.max(height as f64 * config.level_unit),
        height: viewport.height.max(count as f64 * config.row_unit),
    };
    if canvas.width > config.max_canvas_extent || canvas.height > config.max_canvas_extent {
        return Err(LayoutOverflowError::CanvasTooLarge {
            width: canvas.width,
            height: canvas.height,
            max: config.max_canvas_extent,
        }
        .into());
    }

    let separation = config.separation();
    let raw = tidy_breadth(&flat.children, separation);

    // Fit the raw breadth range into the breadth extent, leaving half a
    // separation on each side.
    let (mut left, mut right) = (0, 0);
    for (id, &x) in raw.iter().enumerate() {
        if x < raw[left] {
            left = id;
        }
        if x > raw[right] {
            right = id;
        }
    }
    let pad = if left == right {
        1.0
    } else {
        separation.between(flat.parent[left], flat.parent[right]) / 2.0
    };
    let offset = pad - raw[left];
    let breadth_extent = (canvas.height - config.breadth_padding).max(config.row_unit);
    let depth_extent = (canvas.width - config.depth_padding).max(config.level_unit);
    let kx = breadth_extent / (raw[right] + pad + offset);
    let ky = depth_extent / height.max(1) as f64;

    let positions: Vec<Point> = raw
        .iter()
        .zip(&flat.depth)
        .map(|(&x, &depth)| Point::new(depth as f64 * ky, (x + offset) * kx))
        .collect();

    let nodes: Vec<LayoutNode> = flat
        .nodes
        .iter()
        .enumerate()
        .map(|(id, node)| LayoutNode {
            id,
            name: node.name.clone(),
            kind: node.kind,
            color: node.color.clone(),
            fill: node_fill(node).to_string(),
            position: positions[id],
            depth: flat.depth[id],
            has_children: !flat.children[id].is_empty(),
            parent: flat.parent[id],
        })
        .collect();

    let edges: Vec<EdgeSpec> = (0..count)
        .filter_map(|target| flat.parent[target].map(|source| (source, target)))
        .map(|(source, target)| EdgeSpec {
            source,
            target,
            curve: CubicCurve::horizontal(positions[source], positions[target]),
            color: edge_color(flat.nodes[source], flat.nodes[target]).to_string(),
        })
        .collect();

    let device = config.device_for(viewport.width);
    let initial_transform = config.preset(device).transform_for(viewport);
    crate::debug!(
        "Layout: {count} nodes, height {height}, canvas {:.0}x{:.0}, {device:?}",
        canvas.width,
        canvas.height
    );

    Ok(Layout {
        nodes,
        edges,
        canvas,
        viewport,
        device,
        initial_transform,
        height,
    })
}

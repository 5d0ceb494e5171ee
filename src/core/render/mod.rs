//! Render adapter: paints a layout plus the live view onto a drawing surface
//!
//! [`RenderAdapter::paint`] is the only place that decides what a mind map
//! looks like. It talks to the outside world through the [`Surface`] trait;
//! [`SceneRecorder`] is the in-memory surface the exporters serialize.

pub mod formats;
pub mod mermaid;
pub mod scene;
pub mod svg;

pub use crate::core::interaction::ViewState;
pub use formats::OutputFormat;
pub use mermaid::MermaidExporter;
pub use scene::{DrawCommand, SceneRecorder};
pub use svg::{HtmlExporter, SvgExporter};

use crate::core::interaction::Action;
use crate::core::layout::{CubicCurve, DeviceClass, Layout, LayoutNode, Point, ViewTransform, Viewport};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Outline and label color
pub const FOREGROUND: &str = "#ffffff";

/// Page and canvas background
pub const BACKGROUND: &str = "#020617";

/// Dark halo that keeps labels legible over colored edges
pub const TEXT_SHADOW: &str = "0 2px 6px rgba(0,0,0,0.9), 0 0 3px rgba(0,0,0,0.5)";

/// Stroke parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    /// CSS color
    pub color: String,
    /// Width in world units
    pub width: f64,
    /// Opacity in `[0, 1]`
    pub opacity: f64,
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    /// Text starts at the anchor and runs right
    Start,
    /// Text ends at the anchor
    End,
}

impl TextAnchor {
    /// SVG `text-anchor` value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// Which side of its node a label sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSide {
    /// Toward the parent
    Left,
    /// Away from the parent
    Right,
}

/// Label position relative to its node.
///
/// Nodes with children put the label on the left so it doesn't run into the
/// subtree; leaves put it on the right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelPlacement {
    /// Side of the node
    pub side: LabelSide,
    /// Text alignment at the anchor point
    pub anchor: TextAnchor,
    /// Horizontal offset from the node center
    pub offset_x: f64,
    /// Font size in pixels
    pub font_size: f64,
}

impl LabelPlacement {
    /// Placement for a node on a given device class
    #[must_use]
    pub fn for_node(node: &LayoutNode, device: DeviceClass) -> Self {
        let (gap, font_size) = if device.is_mobile() {
            (8.0, 11.0)
        } else {
            (15.0, 14.0)
        };
        if node.has_children {
            Self {
                side: LabelSide::Left,
                anchor: TextAnchor::End,
                offset_x: -gap,
                font_size,
            }
        } else {
            Self {
                side: LabelSide::Right,
                anchor: TextAnchor::Start,
                offset_x: gap,
                font_size,
            }
        }
    }
}

/// Text styling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    /// Alignment at the anchor point
    pub anchor: TextAnchor,
    /// Font size in pixels
    pub font_size: f64,
    /// CSS font weight
    pub font_weight: u16,
    /// Fill color
    pub fill: String,
    /// Vertical shift in ems, centers the text on the anchor
    pub baseline_shift_em: f64,
    /// CSS text-shadow
    pub shadow: String,
}

/// Anything a mind map can be drawn onto.
///
/// Coordinates passed to the drawing calls are world coordinates; the
/// surface applies the frame's transform.
pub trait Surface {
    /// Start a frame of the given size under a transform
    fn begin_frame(&mut self, size: Viewport, transform: ViewTransform);

    /// Stroke a curve
    fn stroke_curve(&mut self, curve: &CubicCurve, stroke: &Stroke);

    /// Fill and outline a circle
    fn fill_circle(&mut self, center: Point, radius: f64, fill: &str, outline: &Stroke);

    /// Draw a text label
    fn draw_text(&mut self, at: Point, text: &str, style: &TextStyle);

    /// Finish the frame
    fn end_frame(&mut self) {}
}

/// Receives node activations from the view.
pub trait ActivationSink {
    /// A node was activated
    fn node_activated(&mut self, name: &str);
}

impl<F: FnMut(&str)> ActivationSink for F {
    fn node_activated(&mut self, name: &str) {
        self(name);
    }
}

/// Paints layouts. Holds only styling, no per-tree state.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderAdapter {
    /// Radius of the hovered node
    pub hover_radius: f64,
    /// Edge stroke width
    pub edge_width: f64,
    /// Edge stroke opacity
    pub edge_opacity: f64,
    /// Node outline width
    pub outline_width: f64,
}

impl Default for RenderAdapter {
    fn default() -> Self {
        Self {
            hover_radius: 10.0,
            edge_width: 1.5,
            edge_opacity: 0.6,
            outline_width: 1.5,
        }
    }
}

impl RenderAdapter {
    /// Draw one frame: all edges first, then each node's circle and label
    pub fn paint<S: Surface + ?Sized>(&self, layout: &Layout, view: &ViewState, surface: &mut S) {
        surface.begin_frame(view.surface, view.transform);

        for edge in &layout.edges {
            let stroke = Stroke {
                color: edge.color.clone(),
                width: self.edge_width,
                opacity: self.edge_opacity,
            };
            surface.stroke_curve(&edge.curve, &stroke);
        }

        let outline = Stroke {
            color: FOREGROUND.to_string(),
            width: self.outline_width,
            opacity: 1.0,
        };
        for node in &layout.nodes {
            surface.fill_circle(node.position, self.radius(node, view), &node.fill, &outline);

            let placement = LabelPlacement::for_node(node, layout.device);
            let style = TextStyle {
                anchor: placement.anchor,
                font_size: placement.font_size,
                font_weight: 500,
                fill: FOREGROUND.to_string(),
                baseline_shift_em: 0.35,
                shadow: TEXT_SHADOW.to_string(),
            };
            let at = Point::new(node.position.x + placement.offset_x, node.position.y);
            surface.draw_text(at, &node.name, &style);
        }

        surface.end_frame();
    }

    /// Circle radius of a node in the given view
    #[must_use]
    pub fn radius(&self, node: &LayoutNode, view: &ViewState) -> f64 {
        if view.hovered == Some(node.id) {
            self.hover_radius
        } else {
            node.base_radius()
        }
    }
}

/// Forward every activation in `actions` to `sink`; returns how many.
pub fn dispatch_activations(actions: &[Action], sink: &mut impl ActivationSink) -> usize {
    let mut count = 0;
    for action in actions {
        if let Action::NodeActivated(name) = action {
            sink.node_activated(name);
            count += 1;
        }
    }
    count
}

/// Everything an exporter needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Document title (usually the topic name)
    pub title: &'a str,
    /// Layout to draw
    pub layout: &'a Layout,
    /// View to draw it under
    pub view: ViewState,
}

impl<'a> RenderContext<'a> {
    /// Create a context for an explicit view
    #[must_use]
    pub const fn new(title: &'a str, layout: &'a Layout, view: ViewState) -> Self {
        Self {
            title,
            layout,
            view,
        }
    }

    /// Context for the first frame of a layout: initial transform, no hover
    #[must_use]
    pub const fn initial(title: &'a str, layout: &'a Layout) -> Self {
        Self::new(
            title,
            layout,
            ViewState {
                transform: layout.initial_transform,
                hovered: None,
                surface: layout.viewport,
            },
        )
    }
}

/// Trait for mind map exporters
pub trait MapExporter {
    /// Render the frame to a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, ctx: &RenderContext) -> Result<String, Box<dyn Error>>;

    /// Render the frame to a file
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails
    fn generate(&self, ctx: &RenderContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let content = self.render(ctx)?;
        fs::write(output_path, content)?;
        Ok(())
    }
}

//! In-memory surface that records paint calls

use super::{Stroke, Surface, TextStyle};
use crate::core::layout::{CubicCurve, Point, ViewTransform, Viewport};
use serde::Serialize;

/// One recorded paint call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Frame start
    Begin {
        /// Surface size
        size: Viewport,
        /// View transform for the frame
        transform: ViewTransform,
    },
    /// Stroked curve
    Curve {
        /// Geometry
        curve: CubicCurve,
        /// Stroke
        stroke: Stroke,
    },
    /// Filled, outlined circle
    Circle {
        /// Center
        center: Point,
        /// Radius
        radius: f64,
        /// Fill color
        fill: String,
        /// Outline
        outline: Stroke,
    },
    /// Text label
    Text {
        /// Anchor point
        at: Point,
        /// Label
        text: String,
        /// Styling
        style: TextStyle,
    },
    /// Frame end
    End,
}

/// A [`Surface`] that keeps every call for later inspection or export.
#[derive(Debug, Clone, Default)]
pub struct SceneRecorder {
    commands: Vec<DrawCommand>,
}

impl SceneRecorder {
    /// Create an empty recorder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Recorded calls in order
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded calls matching a predicate
    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }
}

impl Surface for SceneRecorder {
    fn begin_frame(&mut self, size: Viewport, transform: ViewTransform) {
        // A recorder holds one frame at a time.
        self.commands.clear();
        self.commands.push(DrawCommand::Begin { size, transform });
    }

    fn stroke_curve(&mut self, curve: &CubicCurve, stroke: &Stroke) {
        self.commands.push(DrawCommand::Curve {
            curve: *curve,
            stroke: stroke.clone(),
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: &str, outline: &Stroke) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill: fill.to_string(),
            outline: outline.clone(),
        });
    }

    fn draw_text(&mut self, at: Point, text: &str, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            style: style.clone(),
        });
    }

    fn end_frame(&mut self) {
        self.commands.push(DrawCommand::End);
    }
}

//! SVG and HTML exporters
//!
//! Both paint the frame into a [`SceneRecorder`] and serialize the recorded
//! commands through askama templates in `templates/`.

use super::{
    DrawCommand, MapExporter, RenderAdapter, RenderContext, SceneRecorder, BACKGROUND,
};
use crate::core::get_version;
use crate::core::guide::{GuideSection, GUIDE};
use crate::core::layout::edges::fmt_coord;
use askama::Template;
use std::error::Error;

struct SvgPath {
    d: String,
    color: String,
    width: String,
    opacity: String,
}

struct SvgLabel {
    x: String,
    y: String,
    dy: String,
    anchor: &'static str,
    font_size: String,
    font_weight: u16,
    fill: String,
    shadow: String,
    text: String,
}

struct SvgNode {
    cx: String,
    cy: String,
    r: String,
    fill: String,
    outline: String,
    outline_width: String,
    label: Option<SvgLabel>,
}

#[derive(Template)]
#[template(path = "mindmap.svg", escape = "html")]
struct SvgTemplate<'a> {
    title: &'a str,
    width: String,
    height: String,
    background: &'a str,
    transform: String,
    edges: Vec<SvgPath>,
    nodes: Vec<SvgNode>,
}

#[derive(Template)]
#[template(path = "page.html", escape = "html")]
struct PageTemplate<'a> {
    title: &'a str,
    node_count: usize,
    version: &'a str,
    background: &'a str,
    guide: &'a [GuideSection],
    svg: String,
}

/// Standalone SVG of one frame
#[derive(Debug, Clone, Default)]
pub struct SvgExporter {
    adapter: RenderAdapter,
}

impl SvgExporter {
    /// Create an exporter with default styling
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn template<'a>(&self, ctx: &RenderContext<'a>) -> SvgTemplate<'a> {
        let mut scene = SceneRecorder::new();
        self.adapter.paint(ctx.layout, &ctx.view, &mut scene);

        let mut edges = Vec::new();
        let mut nodes: Vec<SvgNode> = Vec::new();
        for command in scene.commands() {
            match command {
                DrawCommand::Curve { curve, stroke } => edges.push(SvgPath {
                    d: curve.to_string(),
                    color: stroke.color.clone(),
                    width: fmt_coord(stroke.width),
                    opacity: fmt_coord(stroke.opacity),
                }),
                DrawCommand::Circle {
                    center,
                    radius,
                    fill,
                    outline,
                } => nodes.push(SvgNode {
                    cx: fmt_coord(center.x),
                    cy: fmt_coord(center.y),
                    r: fmt_coord(*radius),
                    fill: fill.clone(),
                    outline: outline.color.clone(),
                    outline_width: fmt_coord(outline.width),
                    label: None,
                }),
                DrawCommand::Text { at, text, style } => {
                    // Labels follow their node's circle.
                    if let Some(node) = nodes.last_mut() {
                        node.label = Some(SvgLabel {
                            x: fmt_coord(at.x),
                            y: fmt_coord(at.y),
                            dy: format!("{}em", style.baseline_shift_em),
                            anchor: style.anchor.as_str(),
                            font_size: fmt_coord(style.font_size),
                            font_weight: style.font_weight,
                            fill: style.fill.clone(),
                            shadow: style.shadow.clone(),
                            text: text.clone(),
                        });
                    }
                }
                DrawCommand::Begin { .. } | DrawCommand::End => {}
            }
        }

        let t = ctx.view.transform;
        SvgTemplate {
            title: ctx.title,
            width: fmt_coord(ctx.view.surface.width),
            height: fmt_coord(ctx.view.surface.height),
            background: BACKGROUND,
            transform: format!(
                "translate({},{}) scale({})",
                fmt_coord(t.translate_x),
                fmt_coord(t.translate_y),
                t.scale
            ),
            edges,
            nodes,
        }
    }
}

impl MapExporter for SvgExporter {
    fn render(&self, ctx: &RenderContext) -> Result<String, Box<dyn Error>> {
        Ok(self.template(ctx).render()?)
    }
}

/// Self-contained HTML page: header, guide and the SVG frame
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter {
    svg: SvgExporter,
}

impl HtmlExporter {
    /// Create an exporter with default styling
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MapExporter for HtmlExporter {
    fn render(&self, ctx: &RenderContext) -> Result<String, Box<dyn Error>> {
        let page = PageTemplate {
            title: ctx.title,
            node_count: ctx.layout.nodes.len(),
            version: get_version(),
            background: BACKGROUND,
            guide: &GUIDE,
            svg: self.svg.render(ctx)?,
        };
        Ok(page.render()?)
    }
}

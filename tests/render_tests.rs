//! Integration tests for exporters: layout in, files out

use mindmap_explorer::core::interaction::{InputEvent, InteractionConfig, InteractionController};
use mindmap_explorer::core::layout::{Layout, Point, Viewport};
use mindmap_explorer::core::models::Topic;
use mindmap_explorer::core::render::{
    DrawCommand, MapExporter, OutputFormat, RenderAdapter, RenderContext, SceneRecorder,
};
use std::fs;

fn seed() -> (Topic, Layout) {
    let topic = Topic::spring_seed().unwrap();
    let layout = Layout::compute(&topic.data, 1024.0, 768.0).unwrap();
    (topic, layout)
}

#[test]
fn scene_draws_edges_before_nodes() {
    let (topic, layout) = seed();
    let ctx = RenderContext::initial(&topic.name, &layout);
    let mut scene = SceneRecorder::new();
    RenderAdapter::default().paint(ctx.layout, &ctx.view, &mut scene);

    let curves = scene.count(|c| matches!(c, DrawCommand::Curve { .. }));
    let circles = scene.count(|c| matches!(c, DrawCommand::Circle { .. }));
    let texts = scene.count(|c| matches!(c, DrawCommand::Text { .. }));
    assert_eq!(curves, 50);
    assert_eq!(circles, 51);
    assert_eq!(texts, 51);

    let first_circle = scene
        .commands()
        .iter()
        .position(|c| matches!(c, DrawCommand::Circle { .. }))
        .unwrap();
    let last_curve = scene
        .commands()
        .iter()
        .rposition(|c| matches!(c, DrawCommand::Curve { .. }))
        .unwrap();
    assert!(last_curve < first_circle);
}

#[test]
fn every_format_writes_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let (topic, layout) = seed();
    let ctx = RenderContext::initial(&topic.name, &layout);

    for format in [OutputFormat::Svg, OutputFormat::Html, OutputFormat::Mermaid] {
        let path = dir.path().join(format!("spring.{}", format.extension()));
        format.exporter().generate(&ctx, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty(), "{format}");
    }
}

#[test]
fn svg_contains_every_node() {
    let (topic, layout) = seed();
    let svg = OutputFormat::Svg
        .exporter()
        .render(&RenderContext::initial(&topic.name, &layout))
        .unwrap();

    assert_eq!(svg.matches("<circle").count(), 51);
    assert_eq!(svg.matches("class=\"link-path\"").count(), 50);
    assert!(svg.contains("translate(80,50) scale(0.75)"));
    assert!(svg.contains("@RestController"));
}

#[test]
fn html_page_embeds_svg_and_guide() {
    let (topic, layout) = seed();
    let html = OutputFormat::Html
        .exporter()
        .render(&RenderContext::initial(&topic.name, &layout))
        .unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<svg"));
    assert!(html.contains("Spring Framework"));
    assert!(html.contains("Quick search"));
}

#[test]
fn mermaid_lists_nodes_by_depth() {
    let (topic, layout) = seed();
    let mermaid = OutputFormat::Mermaid
        .exporter()
        .render(&RenderContext::initial(&topic.name, &layout))
        .unwrap();

    let mut lines = mermaid.lines();
    assert_eq!(lines.next(), Some("mindmap"));
    assert_eq!(lines.next(), Some("  n0((\"Spring Annotations\"))"));
    assert_eq!(mermaid.lines().count(), 52);
}

#[test]
fn frame_follows_the_controller() {
    let (topic, layout) = seed();
    let mut controller =
        InteractionController::new(layout, Viewport::new(1024.0, 768.0), InteractionConfig::default());
    controller.handle(InputEvent::Resize { width: 640.0, height: 480.0 });
    controller.handle(InputEvent::Wheel { at: Point::new(0.0, 0.0), delta_y: -500.0 });

    let ctx = RenderContext::new(&topic.name, controller.layout(), controller.view_state());
    let svg = OutputFormat::Svg.exporter().render(&ctx).unwrap();

    assert!(svg.contains("viewBox=\"0 0 640 480\""));
    assert!(svg.contains("scale(1.5"));
}

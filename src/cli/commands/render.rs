//! Render command handler
//!
//! Lays out a tree, optionally replays recorded input through the
//! interaction controller, and writes one frame in the requested format.

use super::{load_topic, output_path, slug};
use crate::args::TreeSource;
use mindmap_explorer::config::Config;
use mindmap_explorer::core::interaction::{InputEvent, InteractionConfig, InteractionController};
use mindmap_explorer::core::layout::{compute_layout, Viewport};
use mindmap_explorer::core::models::Topic;
use mindmap_explorer::core::render::{dispatch_activations, OutputFormat, RenderContext};
use mindmap_explorer::{debug, error, info, verbose};
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments of one render run
pub struct RenderRequest<'a> {
    /// Tree to render
    pub source: &'a TreeSource,
    /// Output format name
    pub format: &'a str,
    /// Explicit output path
    pub output: Option<&'a Path>,
    /// Viewport width
    pub width: f64,
    /// Viewport height
    pub height: f64,
    /// Recorded input events
    pub events: Option<&'a Path>,
}

/// Run the render command.
pub fn run(request: &RenderRequest, config: &Config) -> Result<(), String> {
    let format: OutputFormat = request.format.parse().map_err(|e| format!("✗ {e}"))?;
    let topic = load_topic(request.source)?;
    let viewport = Viewport::new(request.width, request.height);

    let mut controller = controller_for(&topic, viewport, config)?;
    if let Some(path) = request.events {
        let events = read_events(path)?;
        info!("Replaying {} events from {}", events.len(), path.display());
        for name in replay(&mut controller, &events) {
            println!("→ Activated: {name}");
        }
    }

    let path = write_frame(&topic, &controller, format, request.output, config)?;
    println!("✓ Rendered {}: {}", topic.name, path.display());
    Ok(())
}

/// Lay out `topic` for `viewport` and bind a controller to it
pub fn controller_for(
    topic: &Topic,
    viewport: Viewport,
    config: &Config,
) -> Result<InteractionController, String> {
    let layout = compute_layout(&topic.data, viewport, &config.layout_config()).map_err(|e| {
        error!("Layout failed for {}: {e}", topic.name);
        format!("✗ Failed to lay out {}: {e}", topic.name)
    })?;
    verbose!(
        "Laid out {} nodes on a {:.0}x{:.0} canvas",
        layout.nodes.len(),
        layout.canvas.width,
        layout.canvas.height
    );
    Ok(InteractionController::new(
        layout,
        viewport,
        InteractionConfig::default(),
    ))
}

/// Write the controller's current frame; returns the file written
pub fn write_frame(
    topic: &Topic,
    controller: &InteractionController,
    format: OutputFormat,
    output: Option<&Path>,
    config: &Config,
) -> Result<PathBuf, String> {
    let file_name = format!("{}.{}", slug(&topic.name), format.extension());
    let path = output_path(output, config, &file_name)?;

    let ctx = RenderContext::new(&topic.name, controller.layout(), controller.view_state());
    format.exporter().generate(&ctx, &path).map_err(|e| {
        error!("Failed to write {}: {e}", path.display());
        format!("✗ Failed to write {}: {e}", path.display())
    })?;
    info!("Wrote {format} frame to {}", path.display());
    Ok(path)
}

/// Parse a JSON array of input events
fn read_events(path: &Path) -> Result<Vec<InputEvent>, String> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("✗ Failed to read events {}: {e}", path.display()))?;
    serde_json::from_str(&json)
        .map_err(|e| format!("✗ Invalid events in {}: {e}", path.display()))
}

/// Feed `events` through the controller; returns activated node names in order
pub fn replay(controller: &mut InteractionController, events: &[InputEvent]) -> Vec<String> {
    let mut activated = Vec::new();
    for &event in events {
        let actions = controller.handle(event);
        for action in &actions {
            debug!("{event:?} -> {action:?}");
        }
        dispatch_activations(&actions, &mut |name: &str| activated.push(name.to_string()));
    }
    activated
}

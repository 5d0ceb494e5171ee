//! Topics command handler

use mindmap_explorer::core::models::TopicCatalog;

/// List every catalog topic with its size.
pub fn run() -> Result<(), String> {
    let catalog =
        TopicCatalog::with_seed().map_err(|e| format!("✗ Failed to load built-in topics: {e}"))?;

    println!("\n=== Topics ===\n");
    for topic in catalog.topics() {
        println!(
            "  {:<12} {} ({}, {} nodes)",
            topic.id,
            topic.name,
            topic.category,
            topic.data.node_count()
        );
    }
    Ok(())
}

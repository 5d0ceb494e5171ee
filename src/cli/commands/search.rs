//! Search command handler
//!
//! Lists matching leaves. With `--select`, the chosen match is activated
//! through the interaction controller and its details are looked up the
//! same way a click would.

use super::explain;
use super::load_topic;
use super::render::controller_for;
use crate::args::TreeSource;
use mindmap_explorer::config::Config;
use mindmap_explorer::core::ai::ContentGenerator;
use mindmap_explorer::core::layout::Viewport;
use mindmap_explorer::core::models::Topic;
use mindmap_explorer::core::render::dispatch_activations;
use mindmap_explorer::core::search::{filter, leaf_names};
use mindmap_explorer::{debug, verbose};

/// Print the leaf names of the chosen tree that contain `query`, then
/// explain `select` if given.
pub fn run(
    query: &str,
    select: Option<&str>,
    source: &TreeSource,
    config: &Config,
) -> Result<(), String> {
    let topic = load_topic(source)?;
    let names = leaf_names(&topic.data);
    verbose!("Searching {} leaves of {}", names.len(), topic.name);

    let matches = filter(&names, query);
    if matches.is_empty() {
        println!("No matches for '{}' in {}", query.trim(), topic.name);
    }
    for name in &matches {
        println!("{name}");
    }

    let Some(selected) = select else {
        return Ok(());
    };
    if !matches.iter().any(|name| *name == selected) {
        return Err(format!(
            "✗ '{selected}' is not among the matches for '{}'",
            query.trim()
        ));
    }
    let client = explain::client(config)?;
    print!("{}", select_match(&topic, selected, &client, config)?);
    Ok(())
}

/// Activate `name` as a click would and explain whatever the activation reached
fn select_match<G: ContentGenerator + ?Sized>(
    topic: &Topic,
    name: &str,
    generator: &G,
    config: &Config,
) -> Result<String, String> {
    let controller = controller_for(topic, Viewport::default(), config)?;
    let action = controller
        .activate(name)
        .ok_or_else(|| format!("✗ No node named '{name}' in {}", topic.name))?;
    debug!("Selected {name}: {action:?}");

    let mut details = Ok(String::new());
    dispatch_activations(&[action], &mut |activated: &str| {
        details = explain::describe(generator, activated);
    });
    details
}

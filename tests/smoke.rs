//! Integration smoke tests for `mindmap_explorer`

use mindmap_explorer::core::ai::{generate_mind_map, AiError, ContentGenerator};
use mindmap_explorer::core::layout::Layout;
use mindmap_explorer::core::models::TopicCatalog;
use mindmap_explorer::core::search::{filter, leaf_names};
use mindmap_explorer::get_version;
use serde_json::{json, Value};

#[test]
fn version_is_not_empty() {
    let v = get_version();
    assert!(!v.trim().is_empty());
}

#[test]
fn catalog_search_finds_seed_leaves() {
    let catalog = TopicCatalog::with_seed().unwrap();
    let topic = catalog.get("spring-1").unwrap();
    let names = leaf_names(&topic.data);

    assert_eq!(filter(&names, "restcontroller"), vec!["@Controller | @RestController"]);
    assert!(filter(&names, "  ").is_empty());
}

struct Offline;

impl ContentGenerator for Offline {
    fn generate_json(&self, _prompt: &str, _schema: &Value) -> Result<Value, AiError> {
        Ok(json!({
            "name": "Tokio", "type": "root",
            "children": [
                { "name": "Runtime", "type": "category", "color": "#2563eb",
                  "children": [{ "name": "spawn", "type": "annotation" }] },
                { "name": "Sync", "type": "category",
                  "children": [{ "name": "Mutex", "type": "annotation" }] }
            ]
        }))
    }
}

#[test]
fn generated_tree_lays_out() {
    let tree = generate_mind_map(&Offline, "Tokio").unwrap();
    let layout = Layout::compute(&tree, 1024.0, 768.0).unwrap();

    assert_eq!(layout.nodes.len(), 5);
    assert_eq!(layout.edges.len(), 4);
    assert_eq!(layout.node_by_name("spawn").unwrap().depth, 2);
}

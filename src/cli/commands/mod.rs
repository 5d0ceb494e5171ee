//! CLI command handlers for `MindMap Explorer`.
//!
//! Each command is implemented in its own submodule and reports failures as
//! `✗`-prefixed messages.

pub mod config;
pub mod explain;
pub mod generate;
pub mod guide;
pub mod render;
pub mod search;
pub mod topics;

use crate::args::TreeSource;
use mindmap_explorer::config::Config;
use mindmap_explorer::core::models::{Topic, TopicCatalog, TreeNode};
use mindmap_explorer::error;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve a tree source: a JSON file, a catalog topic, or the default seed
pub fn load_topic(source: &TreeSource) -> Result<Topic, String> {
    if let Some(path) = &source.tree {
        return load_tree_file(path);
    }

    let catalog = TopicCatalog::with_seed().map_err(|e| {
        error!("Built-in topics are malformed: {e}");
        format!("✗ Failed to load built-in topics: {e}")
    })?;

    match &source.topic {
        Some(id) => catalog
            .get(id)
            .cloned()
            .ok_or_else(|| format!("✗ Unknown topic: '{id}' (see `mindmap topics`)")),
        None => catalog
            .topics()
            .first()
            .cloned()
            .ok_or_else(|| "✗ Topic catalog is empty".to_string()),
    }
}

/// Read and validate a tree JSON file; the file stem becomes the topic id
fn load_tree_file(path: &Path) -> Result<Topic, String> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("✗ Failed to read {}: {e}", path.display()))?;
    let tree = TreeNode::from_json(&json).map_err(|e| {
        error!("Malformed tree in {}: {e}", path.display());
        format!("✗ Malformed tree in {}: {e}", path.display())
    })?;
    let id = path
        .file_stem()
        .map_or_else(|| "tree".to_string(), |s| s.to_string_lossy().to_string());
    Ok(Topic::new(id, tree.name.clone(), "Files", tree))
}

/// File-name friendly form of a title
pub fn slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "mindmap".to_string()
    } else {
        slug.to_string()
    }
}

/// `output` if given, else `<output_dir>/<name>`; creates the parent directory
pub fn output_path(output: Option<&Path>, config: &Config, name: &str) -> Result<PathBuf, String> {
    let path = output.map_or_else(
        || PathBuf::from(&config.paths.output_dir).join(name),
        Path::to_path_buf,
    );
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("✗ Failed to create directory {}: {e}", parent.display()))?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Spring Framework"), "spring-framework");
        assert_eq!(slug("  C++ / Rust!  "), "c-rust");
        assert_eq!(slug("@@@"), "mindmap");
    }

    #[test]
    fn test_load_default_topic() {
        let topic = load_topic(&TreeSource::default()).unwrap();
        assert_eq!(topic.id, "spring-1");
    }

    #[test]
    fn test_load_unknown_topic() {
        let source = TreeSource {
            topic: Some("nope".to_string()),
            tree: None,
        };
        assert!(load_topic(&source).unwrap_err().starts_with('✗'));
    }

    #[test]
    fn test_load_tree_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rust.json");
        fs::write(&path, r#"{"name": "Rust", "type": "root", "children": []}"#).unwrap();
        let source = TreeSource {
            topic: None,
            tree: Some(path),
        };
        let topic = load_topic(&source).unwrap();
        assert_eq!(topic.id, "rust");
        assert_eq!(topic.name, "Rust");
    }

    #[test]
    fn test_output_path_default_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.output_dir = dir.path().join("maps").to_string_lossy().to_string();
        let path = output_path(None, &config, "a.svg").unwrap();
        assert_eq!(path, dir.path().join("maps").join("a.svg"));
        assert!(dir.path().join("maps").is_dir());
    }
}

//! Substring search over a tree's leaf names

use crate::core::models::TreeNode;

/// Names of every leaf in `tree`, sorted and without duplicates
#[must_use]
pub fn leaf_names(tree: &TreeNode) -> Vec<String> {
    let mut names = Vec::new();
    tree.walk(&mut |node, _| {
        if node.is_leaf() {
            names.push(node.name.clone());
        }
    });
    names.sort();
    names.dedup();
    names
}

/// Names containing `query`, ignoring case. A blank query matches nothing.
#[must_use]
pub fn filter<'a>(names: &'a [String], query: &str) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    names
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect()
}

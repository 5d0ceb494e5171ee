//! Labeled hierarchy rendered as a mind map

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Default neutral color for nodes and edges without a color of their own.
pub const DEFAULT_COLOR: &str = "#475569";

/// Semantic role of a node; drives its rendered size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// The single apex of a tree
    Root,
    /// Grouping node
    Category,
    /// Concrete entry (typically a leaf)
    Annotation,
}

impl NodeKind {
    /// Base circle radius for this kind
    #[must_use]
    pub const fn base_radius(self) -> f64 {
        match self {
            Self::Root => 8.0,
            Self::Category => 6.0,
            Self::Annotation => 4.0,
        }
    }

    /// Wire name (`"root"`, `"category"`, `"annotation"`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Category => "category",
            Self::Annotation => "annotation",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input tree rejected before layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedTreeError {
    /// JSON did not decode into the tree shape (missing `name`/`type`, bad types)
    #[error("malformed tree: {0}")]
    Parse(String),
    /// A node has an empty or whitespace-only name
    #[error("malformed tree: node at {path} has a blank name")]
    BlankName {
        /// Child-index path from the root, e.g. `root/2/0`
        path: String,
    },
    /// The apex node is not of kind `root`
    #[error("malformed tree: apex node '{name}' is a {kind}, expected root")]
    MissingRoot {
        /// Name of the apex node
        name: String,
        /// Its actual kind
        kind: NodeKind,
    },
    /// A `root` node appears below the apex
    #[error("malformed tree: nested root '{name}' at {path}")]
    NestedRoot {
        /// Name of the offending node
        name: String,
        /// Child-index path from the root
        path: String,
    },
    /// A color is not `#rgb` or `#rrggbb`
    #[error("malformed tree: node '{name}' has invalid color '{color}'")]
    InvalidColor {
        /// Name of the offending node
        name: String,
        /// The rejected color value
        color: String,
    },
}

/// A node of the mind map tree.
///
/// JSON shape: `{"name": "...", "type": "root|category|annotation",
/// "color": "#rrggbb"?, "description": "..."?, "children": [...]?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Display label, also used as the selection key
    pub name: String,

    /// Node kind
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Hex color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Optional free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ordered children; empty for leaves
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a childless node
    #[must_use]
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            color: None,
            description: None,
            children: Vec::new(),
        }
    }

    /// Builder: set the color
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Builder: append a child
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: append several children
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Decode and validate a tree from JSON.
    ///
    /// # Errors
    /// Returns [`MalformedTreeError`] if the JSON does not match the tree shape
    /// or the decoded tree fails [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, MalformedTreeError> {
        let tree: Self =
            serde_json::from_str(json).map_err(|e| MalformedTreeError::Parse(e.to_string()))?;
        tree.validate()?;
        Ok(tree)
    }

    /// Decode and validate a tree from an already-parsed JSON value.
    ///
    /// # Errors
    /// Same as [`from_json`](Self::from_json).
    pub fn from_value(value: serde_json::Value) -> Result<Self, MalformedTreeError> {
        let tree: Self =
            serde_json::from_value(value).map_err(|e| MalformedTreeError::Parse(e.to_string()))?;
        tree.validate()?;
        Ok(tree)
    }

    /// Check the structural invariants: root at the apex and nowhere else,
    /// non-blank names, well-formed colors.
    ///
    /// # Errors
    /// Returns the first violation found in pre-order.
    pub fn validate(&self) -> Result<(), MalformedTreeError> {
        if self.kind != NodeKind::Root {
            return Err(MalformedTreeError::MissingRoot {
                name: self.name.clone(),
                kind: self.kind,
            });
        }
        let mut stack = vec![(self, String::from("root"))];
        while let Some((node, path)) = stack.pop() {
            if node.name.trim().is_empty() {
                return Err(MalformedTreeError::BlankName { path });
            }
            if let Some(color) = &node.color {
                if !is_hex_color(color) {
                    return Err(MalformedTreeError::InvalidColor {
                        name: node.name.clone(),
                        color: color.clone(),
                    });
                }
            }
            for (idx, child) in node.children.iter().enumerate().rev() {
                let child_path = format!("{path}/{idx}");
                if child.kind == NodeKind::Root {
                    return Err(MalformedTreeError::NestedRoot {
                        name: child.name.clone(),
                        path: child_path,
                    });
                }
                stack.push((child, child_path));
            }
        }
        Ok(())
    }

    /// Whether this node has no children
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including itself
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_, _| count += 1);
        count
    }

    /// Height of this subtree (0 for a leaf)
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        self.walk(&mut |_, depth| height = height.max(depth));
        height
    }

    /// Visit every node in pre-order with its depth
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self, usize)) {
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            visit(node, depth);
            for child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut result = Ok(());
        self.walk(&mut |node, depth| {
            if result.is_ok() {
                let indent = "  ".repeat(depth);
                result = writeln!(f, "{indent}{} ({})", node.name, node.kind);
            }
        });
        result
    }
}

/// `#rgb` or `#rrggbb`
fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        TreeNode::new("X", NodeKind::Root).with_child(
            TreeNode::new("A", NodeKind::Category)
                .with_child(TreeNode::new("A1", NodeKind::Annotation)),
        )
    }

    #[test]
    fn test_counts() {
        let tree = sample();
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.height(), 2);
        assert!(!tree.is_leaf());
    }

    #[test]
    fn test_from_json() {
        let json = r##"{
            "name": "Root", "type": "root", "color": "#64748b",
            "children": [
                {"name": "Boot", "type": "category", "children": [
                    {"name": "@Bean", "type": "annotation"}
                ]}
            ]
        }"##;
        let tree = TreeNode::from_json(json).unwrap();
        assert_eq!(tree.kind, NodeKind::Root);
        assert_eq!(tree.children[0].children[0].name, "@Bean");
        assert!(tree.children[0].color.is_none());
    }

    #[test]
    fn test_missing_required_field() {
        let err = TreeNode::from_json(r#"{"type": "root"}"#).unwrap_err();
        assert!(matches!(err, MalformedTreeError::Parse(_)));

        let err = TreeNode::from_json(r#"{"name": "x"}"#).unwrap_err();
        assert!(matches!(err, MalformedTreeError::Parse(_)));
    }

    #[test]
    fn test_apex_must_be_root() {
        let err = TreeNode::new("A", NodeKind::Category).validate().unwrap_err();
        assert!(matches!(err, MalformedTreeError::MissingRoot { .. }));
    }

    #[test]
    fn test_nested_root_rejected() {
        let tree = TreeNode::new("X", NodeKind::Root).with_child(
            TreeNode::new("A", NodeKind::Category).with_child(TreeNode::new("Y", NodeKind::Root)),
        );
        let err = tree.validate().unwrap_err();
        assert_eq!(
            err,
            MalformedTreeError::NestedRoot {
                name: "Y".to_string(),
                path: "root/0/0".to_string(),
            }
        );
    }

    #[test]
    fn test_blank_name_rejected() {
        let tree =
            TreeNode::new("X", NodeKind::Root).with_child(TreeNode::new("  ", NodeKind::Annotation));
        assert!(matches!(
            tree.validate(),
            Err(MalformedTreeError::BlankName { .. })
        ));
    }

    #[test]
    fn test_color_validation() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#0d9488"));
        assert!(!is_hex_color("0d9488"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#ggg"));

        let tree = TreeNode::new("X", NodeKind::Root).with_color("red\" onclick=\"x");
        assert!(matches!(
            tree.validate(),
            Err(MalformedTreeError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_display() {
        let display = format!("{}", sample());
        assert!(display.contains("X (root)"));
        assert!(display.contains("    A1 (annotation)"));
    }
}

//! Mermaid diagram generator for mind maps
//!
//! Generates Mermaid `mindmap` syntax that can be embedded in Markdown files
//! and rendered by GitHub, GitLab, and other Markdown viewers.

use super::{MapExporter, RenderContext};
use crate::core::layout::LayoutNode;
use crate::core::models::NodeKind;
use std::error::Error;
use std::fmt::Write;

/// Generator for Mermaid diagram syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct MermaidExporter {
    /// Wrap the diagram in a ```` ```mermaid ```` fence
    pub fenced: bool,
}

impl MermaidExporter {
    /// Raw diagram source
    #[must_use]
    pub const fn new() -> Self {
        Self { fenced: false }
    }

    /// Diagram wrapped for Markdown
    #[must_use]
    pub const fn fenced() -> Self {
        Self { fenced: true }
    }

    /// Mermaid mindmap source for laid-out nodes (pre-order)
    ///
    /// Indentation follows depth; the root is drawn as a circle, categories
    /// as boxes, annotations as rounded boxes.
    #[must_use]
    pub fn diagram(&self, nodes: &[LayoutNode]) -> String {
        let mut output = String::new();
        if self.fenced {
            output.push_str("```mermaid\n");
        }
        output.push_str("mindmap\n");

        for node in nodes {
            let indent = "  ".repeat(node.depth + 1);
            let label = Self::sanitize_label(&node.name);
            let id = node.id;
            let _ = match node.kind {
                NodeKind::Root => writeln!(output, "{indent}n{id}((\"{label}\"))"),
                NodeKind::Category => writeln!(output, "{indent}n{id}[\"{label}\"]"),
                NodeKind::Annotation => writeln!(output, "{indent}n{id}(\"{label}\")"),
            };
        }

        if self.fenced {
            output.push_str("```\n");
        }
        output
    }

    /// Make a node name safe inside a quoted Mermaid label
    fn sanitize_label(name: &str) -> String {
        name.chars()
            .map(|c| match c {
                '"' => '\'',
                '\n' | '\r' | '\t' => ' ',
                _ => c,
            })
            .collect()
    }
}

impl MapExporter for MermaidExporter {
    fn render(&self, ctx: &RenderContext) -> Result<String, Box<dyn Error>> {
        Ok(self.diagram(&ctx.layout.nodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::Layout;
    use crate::core::models::TreeNode;

    #[test]
    fn test_mermaid_generation() {
        let tree = TreeNode::new("Spring", NodeKind::Root).with_child(
            TreeNode::new("Core", NodeKind::Category)
                .with_child(TreeNode::new("@Bean", NodeKind::Annotation)),
        );
        let layout = Layout::compute(&tree, 1024.0, 768.0).unwrap();

        let diagram = MermaidExporter::new().diagram(&layout.nodes);
        let lines: Vec<&str> = diagram.lines().collect();
        assert_eq!(lines[0], "mindmap");
        assert_eq!(lines[1], "  n0((\"Spring\"))");
        assert_eq!(lines[2], "    n1[\"Core\"]");
        assert_eq!(lines[3], "      n2(\"@Bean\")");

        let fenced = MermaidExporter::fenced().diagram(&layout.nodes);
        assert!(fenced.starts_with("```mermaid\nmindmap"));
        assert!(fenced.ends_with("```\n"));
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(MermaidExporter::sanitize_label("say \"hi\""), "say 'hi'");
        assert_eq!(MermaidExporter::sanitize_label("a\nb"), "a b");
    }
}

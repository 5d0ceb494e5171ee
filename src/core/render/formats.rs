//! Output formats for rendered mind maps

use super::{HtmlExporter, MapExporter, MermaidExporter, SvgExporter};
use std::fmt;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Standalone SVG of the current frame
    Svg,
    /// Self-contained HTML page with the SVG and the guide
    Html,
    /// Mermaid `mindmap` source
    Mermaid,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Html => "html",
            Self::Mermaid => "mmd",
        }
    }

    /// Exporter producing this format
    #[must_use]
    pub fn exporter(self) -> Box<dyn MapExporter> {
        match self {
            Self::Svg => Box::new(SvgExporter::new()),
            Self::Html => Box::new(HtmlExporter::new()),
            Self::Mermaid => Box::new(MermaidExporter::new()),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "html" | "htm" => Ok(Self::Html),
            "mermaid" | "mmd" => Ok(Self::Mermaid),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Svg => write!(f, "svg"),
            Self::Html => write!(f, "html"),
            Self::Mermaid => write!(f, "mermaid"),
        }
    }
}

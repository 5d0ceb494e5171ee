//! Usage guide shown by `mindmap guide` and embedded in HTML pages

/// One section of the guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuideSection {
    /// Heading
    pub title: &'static str,
    /// Body text
    pub body: &'static str,
}

/// Guide sections in display order
pub const GUIDE: [GuideSection; 4] = [
    GuideSection {
        title: "Navigation",
        body: "Click and drag the map to move around. Click any node to see its details.",
    },
    GuideSection {
        title: "Zoom",
        body: "Scroll or pinch to zoom in and out around the cursor.",
    },
    GuideSection {
        title: "Quick search",
        body: "Search by name to jump straight to any specific entry.",
    },
    GuideSection {
        title: "AI insights",
        body: "Summaries, use cases, code examples and tips are generated on demand by a generative model.",
    },
];

/// The guide as plain text
#[must_use]
pub fn guide_text() -> String {
    GUIDE
        .iter()
        .map(|s| format!("{}\n  {}\n", s.title, s.body))
        .collect::<Vec<_>>()
        .join("\n")
}

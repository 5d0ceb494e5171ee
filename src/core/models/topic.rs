//! Named tree instances and the catalog that holds them

use super::tree::{MalformedTreeError, TreeNode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Category of the built-in topics
pub const SEED_CATEGORY: &str = "Java Topics";

/// Category of topics produced by AI generation
pub const GENERATED_CATEGORY: &str = "Recent Searches";

const SPRING_SEED: &str = include_str!("../../../assets/seed/spring.json");

/// A named mind map. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Grouping shown in listings
    pub category: String,
    /// The tree itself
    pub data: TreeNode,
}

impl Topic {
    /// Create a topic from an already-validated tree
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        data: TreeNode,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            data,
        }
    }

    /// Create a topic for a freshly generated tree; the id is the creation
    /// time in milliseconds since the Unix epoch.
    #[must_use]
    pub fn generated(query: &str, data: TreeNode) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());
        Self::new(millis.to_string(), query.trim(), GENERATED_CATEGORY, data)
    }

    /// The built-in "Spring Framework" topic.
    ///
    /// # Errors
    /// Returns an error if the compiled-in seed data is malformed.
    pub fn spring_seed() -> Result<Self, MalformedTreeError> {
        let data = TreeNode::from_json(SPRING_SEED)?;
        Ok(Self::new("spring-1", "Spring Framework", SEED_CATEGORY, data))
    }
}

/// Ordered topic list; newest first.
#[derive(Debug, Clone, Default)]
pub struct TopicCatalog {
    topics: Vec<Topic>,
}

impl TopicCatalog {
    /// Create an empty catalog
    #[must_use]
    pub const fn new() -> Self {
        Self { topics: Vec::new() }
    }

    /// Catalog holding the built-in seed topics.
    ///
    /// # Errors
    /// Returns an error if the compiled-in seed data is malformed.
    pub fn with_seed() -> Result<Self, MalformedTreeError> {
        let mut catalog = Self::new();
        catalog.push(Topic::spring_seed()?);
        Ok(catalog)
    }

    /// Insert a topic at the front (most recent)
    pub fn push(&mut self, topic: Topic) {
        self.topics.insert(0, topic);
    }

    /// Find a topic by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// All topics, newest first
    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Number of topics
    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::NodeKind;

    #[test]
    fn test_spring_seed_is_valid() {
        let topic = Topic::spring_seed().unwrap();
        assert_eq!(topic.id, "spring-1");
        assert_eq!(topic.data.kind, NodeKind::Root);
        assert_eq!(topic.data.node_count(), 51);
        assert_eq!(topic.data.height(), 3);
    }

    #[test]
    fn test_catalog_newest_first() {
        let mut catalog = TopicCatalog::with_seed().unwrap();
        let tree = TreeNode::new("Rust", NodeKind::Root);
        catalog.push(Topic::new("42", "Rust", GENERATED_CATEGORY, tree));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.topics()[0].id, "42");
        assert_eq!(catalog.topics()[1].id, "spring-1");
        assert!(catalog.get("spring-1").is_some());
        assert!(catalog.get("nope").is_none());
    }

    #[test]
    fn test_generated_topic() {
        let topic = Topic::generated("  Kubernetes ", TreeNode::new("K8s", NodeKind::Root));
        assert_eq!(topic.name, "Kubernetes");
        assert_eq!(topic.category, GENERATED_CATEGORY);
        assert!(topic.id.parse::<u128>().is_ok());
    }
}

//! Data models for `MindMap Explorer`

pub mod topic;
pub mod tree;

pub use topic::{Topic, TopicCatalog};
pub use tree::{MalformedTreeError, NodeKind, TreeNode, DEFAULT_COLOR};

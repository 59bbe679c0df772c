//! Resolved tree nodes and their JSON shape

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

/// The resolved snapshot of one filesystem path.
///
/// Directories serialize as objects keyed by entry name (sorted, since
/// children live in a `BTreeMap`), files serialize as their path string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Directory { children: BTreeMap<String, TreeNode> },
    File { path: PathBuf },
}

impl TreeNode {
    pub fn empty_dir() -> Self {
        TreeNode::Directory {
            children: BTreeMap::new(),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        TreeNode::File { path: path.into() }
    }

    /// A directory with no children. Empty nodes are pruned from their parent.
    pub fn is_empty(&self) -> bool {
        match self {
            TreeNode::Directory { children } => children.is_empty(),
            TreeNode::File { .. } => false,
        }
    }

    pub fn children(&self) -> Option<&BTreeMap<String, TreeNode>> {
        match self {
            TreeNode::Directory { children } => Some(children),
            TreeNode::File { .. } => None,
        }
    }

    /// Follow a chain of entry names down from this node.
    pub fn get<'a, I>(&self, names: I) -> Option<&TreeNode>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .try_fold(self, |node, name| node.children()?.get(name))
    }

    pub fn file_path(&self) -> Option<&Path> {
        match self {
            TreeNode::File { path } => Some(path),
            TreeNode::Directory { .. } => None,
        }
    }

    /// Number of file leaves below (or at) this node.
    pub fn file_count(&self) -> usize {
        match self {
            TreeNode::File { .. } => 1,
            TreeNode::Directory { children } => children.values().map(TreeNode::file_count).sum(),
        }
    }
}

impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TreeNode::Directory { children } => children.serialize(serializer),
            TreeNode::File { path } => serializer.serialize_str(&path.to_string_lossy()),
        }
    }
}

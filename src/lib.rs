//! dirsnap - snapshot directory trees as nested JSON

pub mod error;
pub mod output;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::ScanError;
pub use output::{print_json, render};
pub use tree::{RunResult, TreeNode, TreeWalker, WalkerConfig};

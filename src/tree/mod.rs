//! Directory tree resolution
//!
//! - `scanner`: lists one directory, split into files and subdirectories
//! - `traversal`: resolves a path recursively, one task per subdirectory
//! - `walker`: runs a traversal per root and collects the snapshot

mod config;
mod node;
mod scanner;
mod traversal;
mod walker;

// Re-export public types
pub use config::WalkerConfig;
pub use node::TreeNode;
pub use scanner::{Entry, Listing, scan};
pub use traversal::{ErrorSink, Fanout, Traverser};
pub use walker::{RunResult, TreeWalker, root_label};

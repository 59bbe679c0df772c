//! TreeWalker - resolves every supplied root concurrently and collects the results

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ScanError;

use super::config::WalkerConfig;
use super::node::TreeNode;
use super::scanner::scan;
use super::traversal::{ErrorSink, Fanout, Traverser};

/// The outcome of one run: every non-empty root plus everything that was skipped.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Root label (last component of the root path) to its resolved tree.
    pub roots: BTreeMap<String, TreeNode>,
    /// Unreadable directories, missing roots and dropped duplicate names, in no particular order.
    pub errors: Vec<ScanError>,
}

/// Walks a list of root paths and builds the full snapshot in memory.
pub struct TreeWalker {
    config: WalkerConfig,
}

impl TreeWalker {
    pub fn new(config: WalkerConfig) -> Self {
        Self { config }
    }

    /// Resolve every root concurrently. Missing roots and roots that resolve
    /// to an empty directory are left out of `roots`.
    pub fn walk<P: AsRef<Path>>(&self, roots: &[P]) -> RunResult {
        let roots: Vec<PathBuf> = roots.iter().map(|p| p.as_ref().to_path_buf()).collect();
        self.run_in_pool(|| self.walk_roots(roots))
    }

    /// Resolve a single path. A missing path yields an empty directory and a
    /// `RootNotFound` error; a plain file yields a file leaf.
    pub fn resolve(&self, path: &Path) -> (TreeNode, Vec<ScanError>) {
        self.run_in_pool(|| {
            let sink = ErrorSink::new();
            let traverser = Traverser::new(&sink, self.fanout());
            let node = resolve_root(&traverser, &sink, path).unwrap_or_else(TreeNode::empty_dir);
            (node, sink.into_errors())
        })
    }

    fn fanout(&self) -> Fanout {
        if self.config.unbounded {
            Fanout::Threads
        } else {
            Fanout::Pool
        }
    }

    fn run_in_pool<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        if self.config.unbounded || self.config.parallel_workers == 0 {
            // Auto-detect: rayon's global pool
            return op();
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.parallel_workers)
            .build()
        {
            Ok(pool) => pool.install(op),
            Err(e) => {
                warn!(error = %e, "cannot build worker pool, using the global pool");
                op()
            }
        }
    }

    fn walk_roots(&self, roots: Vec<PathBuf>) -> RunResult {
        let sink = ErrorSink::new();
        let traverser = Traverser::new(&sink, self.fanout());

        let roots = if self.config.expand_roots {
            expand_roots(roots, &sink)
        } else {
            roots
        };

        let mut resolved = traverser.fan_out(roots.into_iter().enumerate().collect(), |(i, root)| {
            let node = resolve_root(&traverser, &sink, &root);
            (i, root, node)
        });
        resolved.sort_by_key(|(i, _, _)| *i);

        let mut result = BTreeMap::new();
        for (_, root, node) in resolved {
            let Some(node) = node else { continue };
            if node.is_empty() {
                debug!(root = %root.display(), "root resolved empty, omitting");
                continue;
            }
            let label = root_label(&root);
            if result.insert(label.clone(), node).is_some() {
                warn!(label = %label, root = %root.display(), "duplicate root name, keeping the later path");
            }
        }

        RunResult {
            roots: result,
            errors: sink.into_errors(),
        }
    }
}

/// Resolve a root, recording it as `RootNotFound` if it cannot be accessed.
fn resolve_root(traverser: &Traverser<'_>, sink: &ErrorSink, root: &Path) -> Option<TreeNode> {
    if let Err(e) = fs::metadata(root) {
        sink.record(ScanError::root_not_found(root, e));
        return None;
    }
    Some(traverser.resolve(root))
}

/// Replace each path with its immediate entries, sorted by name.
fn expand_roots(roots: Vec<PathBuf>, sink: &ErrorSink) -> Vec<PathBuf> {
    let mut expanded = Vec::new();
    for root in roots {
        match scan(&root) {
            Ok(listing) => {
                let mut entries: Vec<_> = listing.subdirs.into_iter().chain(listing.files).collect();
                entries.sort_by(|a, b| a.name.cmp(&b.name));
                expanded.extend(entries.into_iter().map(|e| e.path));
            }
            Err(ScanError::NotReadable { path, source } | ScanError::RootNotFound { path, source }) => {
                sink.record(ScanError::root_not_found(path, source));
            }
            Err(e) => sink.record(e),
        }
    }
    expanded
}

/// The key a root is stored under: its last path component.
pub fn root_label(path: &Path) -> String {
    match path.components().next_back() {
        Some(Component::Normal(name)) => name.to_string_lossy().to_string(),
        Some(Component::ParentDir) => "..".to_string(),
        Some(Component::RootDir) => MAIN_SEPARATOR.to_string(),
        Some(Component::Prefix(prefix)) => prefix.as_os_str().to_string_lossy().to_string(),
        Some(Component::CurDir) | None => ".".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTree;

    fn walker() -> TreeWalker {
        TreeWalker::new(WalkerConfig::default())
    }

    #[test]
    fn test_root_label() {
        assert_eq!(root_label(Path::new("A")), "A");
        assert_eq!(root_label(Path::new("A/")), "A");
        assert_eq!(root_label(Path::new("some/nested/dir")), "dir");
        assert_eq!(root_label(Path::new("f.txt")), "f.txt");
        assert_eq!(root_label(Path::new(".")), ".");
        assert_eq!(root_label(Path::new("")), ".");
        assert_eq!(root_label(Path::new("..")), "..");
        assert_eq!(root_label(Path::new("/")), MAIN_SEPARATOR.to_string());
    }

    #[test]
    fn test_walk_drops_empty_and_missing_roots() {
        let tree = TestTree::new();
        tree.add_file("A/x.txt", "x");
        tree.add_dir("A/empty");
        tree.add_dir("E/nothing");
        let a = tree.path().join("A");
        let e = tree.path().join("E");
        let z = tree.path().join("Z");

        let result = walker().walk(&[&a, &e, &z]);
        let keys: Vec<_> = result.roots.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A"]);
        assert_eq!(
            result.roots["A"].get(["x.txt"]).and_then(TreeNode::file_path),
            Some(a.join("x.txt").as_path())
        );
        assert!(result.roots["A"].get(["empty"]).is_none());

        assert_eq!(result.errors.len(), 1);
        assert!(matches!(result.errors[0], ScanError::RootNotFound { .. }));
        assert_eq!(result.errors[0].path(), z);
    }

    #[test]
    fn test_walk_file_root() {
        let tree = TestTree::new();
        let f = tree.add_file("f.txt", "x");
        let result = walker().walk(&[&f]);
        assert_eq!(result.roots.get("f.txt"), Some(&TreeNode::file(&f)));
    }

    #[test]
    fn test_resolve_single_path() {
        let tree = TestTree::new();
        let f = tree.add_file("f.txt", "x");
        let (node, errors) = walker().resolve(&f);
        assert_eq!(node, TreeNode::file(&f));
        assert!(errors.is_empty());

        let (node, errors) = walker().resolve(&tree.path().join("missing"));
        assert!(node.is_empty());
        assert!(matches!(errors.as_slice(), [ScanError::RootNotFound { .. }]));
    }

    #[test]
    fn test_duplicate_labels_keep_later_root() {
        let tree = TestTree::new();
        tree.add_file("one/same/first.txt", "1");
        tree.add_file("two/same/second.txt", "2");
        let result = walker().walk(&[tree.path().join("one/same"), tree.path().join("two/same")]);
        assert_eq!(result.roots.len(), 1);
        assert!(result.roots["same"].get(["second.txt"]).is_some());
    }

    #[test]
    fn test_expand_roots() {
        let tree = TestTree::new();
        tree.add_file("top/alpha/a.txt", "a");
        tree.add_file("top/beta/b.txt", "b");
        tree.add_file("top/loose.txt", "l");
        tree.add_dir("top/hollow");

        let config = WalkerConfig {
            expand_roots: true,
            ..Default::default()
        };
        let result = TreeWalker::new(config).walk(&[tree.path().join("top"), tree.path().join("none")]);
        let keys: Vec<_> = result.roots.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["alpha", "beta", "loose.txt"]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path(), tree.path().join("none"));
    }

    #[test]
    fn test_bounded_and_unbounded_agree() {
        let tree = TestTree::new();
        tree.populate(4, 2);
        let root = [tree.path()];

        let sequential = TreeWalker::new(WalkerConfig {
            parallel_workers: 1,
            ..Default::default()
        })
        .walk(&root);
        let unbounded = TreeWalker::new(WalkerConfig {
            unbounded: true,
            ..Default::default()
        })
        .walk(&root);
        let auto = walker().walk(&root);

        assert_eq!(sequential.roots, unbounded.roots);
        assert_eq!(sequential.roots, auto.roots);
        assert!(sequential.errors.is_empty());
    }
}

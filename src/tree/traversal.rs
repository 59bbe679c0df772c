//! Concurrent recursive resolution of directory trees.
//!
//! Every directory is resolved by exactly one task. That task scans the
//! directory, hands each subdirectory to a child task, and joins them all.
//! Children return their finished `TreeNode` by value, and only the parent
//! inserts into its own `children` map. The error sink is the one piece of
//! state shared between tasks.

use std::collections::{BTreeMap, btree_map};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::thread;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::ScanError;

use super::node::TreeNode;
use super::scanner::{Entry, scan};

/// Append-only collection point for errors raised by concurrent tasks.
#[derive(Debug, Default)]
pub struct ErrorSink {
    errors: Mutex<Vec<ScanError>>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, error: ScanError) {
        debug!(path = %error.path().display(), "recording error: {}", error);
        // A panicked writer cannot leave a half-pushed Vec behind, so poisoning is ignored.
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }

    pub fn into_errors(self) -> Vec<ScanError> {
        self.errors
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// How child tasks are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fanout {
    /// Queue children on the current rayon pool (bounded by its thread count).
    Pool,
    /// Spawn one scoped OS thread per child.
    Threads,
}

/// Resolves paths into `TreeNode`s, fanning out one task per subdirectory.
pub struct Traverser<'a> {
    sink: &'a ErrorSink,
    fanout: Fanout,
}

impl<'a> Traverser<'a> {
    pub fn new(sink: &'a ErrorSink, fanout: Fanout) -> Self {
        Self { sink, fanout }
    }

    /// Resolve `path` into a finished node.
    ///
    /// Never fails: anything that is not a directory becomes a file leaf, and
    /// a directory that cannot be listed becomes an empty directory with the
    /// failure recorded in the sink.
    pub fn resolve(&self, path: &Path) -> TreeNode {
        if fs::metadata(path).is_ok_and(|m| !m.is_dir()) {
            return TreeNode::file(path);
        }
        self.resolve_dir(path)
    }

    fn resolve_dir(&self, path: &Path) -> TreeNode {
        debug!(path = %path.display(), "scanning directory");
        let listing = match scan(path) {
            Ok(listing) => listing,
            Err(e) => {
                self.sink.record(e);
                return TreeNode::empty_dir();
            }
        };

        let mut ready: Vec<(Entry, TreeNode)> = listing
            .files
            .into_iter()
            .map(|entry| {
                let node = TreeNode::file(&entry.path);
                (entry, node)
            })
            .collect();

        let resolved = self.fan_out(listing.subdirs, |entry| {
            let node = self.resolve_dir(&entry.path);
            (entry, node)
        });

        // Join point: every child has finished, this task is the only writer.
        for (entry, node) in resolved {
            if node.is_empty() {
                debug!(path = %entry.path.display(), "pruning empty directory");
                continue;
            }
            ready.push((entry, node));
        }

        // Lossy names can collide, so merge in a fixed order to keep keys stable.
        ready.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        let mut children = BTreeMap::new();
        for (entry, node) in ready {
            self.insert_child(&mut children, entry, node);
        }

        TreeNode::Directory { children }
    }

    /// Insert under the entry's name, falling back to its escaped raw name
    /// when a different entry already holds the same (lossy) key.
    fn insert_child(&self, children: &mut BTreeMap<String, TreeNode>, entry: Entry, node: TreeNode) {
        let name = match children.entry(entry.name) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(node);
                return;
            }
            btree_map::Entry::Occupied(slot) => slot.key().clone(),
        };

        let escaped = escaped_name(&entry.path).unwrap_or(name);
        match children.entry(escaped) {
            btree_map::Entry::Vacant(slot) => {
                debug!(path = %entry.path.display(), key = %slot.key(), "name collides, using escaped key");
                slot.insert(node);
            }
            btree_map::Entry::Occupied(slot) => {
                self.sink.record(ScanError::NameCollision {
                    path: entry.path,
                    name: slot.key().clone(),
                });
            }
        }
    }

    /// Run `f` over `items` concurrently and wait for all of them.
    ///
    /// Results come back in input order in pool mode. In thread mode the order
    /// is unspecified; callers that care must carry their own index.
    pub fn fan_out<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync,
    {
        match self.fanout {
            Fanout::Pool => items.into_par_iter().map(&f).collect(),
            Fanout::Threads => spawn_per_item(items, &f),
        }
    }
}

fn spawn_per_item<T, R, F>(items: Vec<T>, f: &F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
{
    // Items sit in slots so a failed spawn can still take its item back.
    let slots: Vec<Mutex<Option<T>>> = items.into_iter().map(|i| Mutex::new(Some(i))).collect();

    thread::scope(|scope| {
        let mut results = Vec::with_capacity(slots.len());
        let mut handles = Vec::with_capacity(slots.len());

        for slot in &slots {
            match thread::Builder::new().spawn_scoped(scope, move || take(slot).map(f)) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    warn!(error = %e, "cannot spawn traversal thread, resolving inline");
                    results.extend(take(slot).map(f));
                }
            }
        }

        for handle in handles {
            match handle.join() {
                Ok(result) => results.extend(result),
                Err(_) => warn!("traversal thread panicked, subtree dropped"),
            }
        }

        results
    })
}

/// The raw file name with invalid UTF-8 bytes escaped (`a\xFF`).
fn escaped_name(path: &Path) -> Option<String> {
    let debug = format!("{:?}", path.file_name()?);
    let inner = debug.strip_prefix('"')?.strip_suffix('"')?;
    Some(inner.to_string())
}

fn take<T>(slot: &Mutex<Option<T>>) -> Option<T> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

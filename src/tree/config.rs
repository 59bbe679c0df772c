//! Configuration types for tree walkers

/// Configuration for tree walking behavior.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Number of worker threads scanning directories.
    /// 0 = auto-detect (use rayon's global pool)
    /// 1 = sequential (single worker)
    /// N = use N worker threads
    pub parallel_workers: usize,
    /// Spawn one thread per directory instead of queueing on a pool.
    /// Very wide or deep trees can exhaust OS threads in this mode.
    pub unbounded: bool,
    /// Replace every supplied path with its immediate entries, each of
    /// which becomes a root of its own.
    pub expand_roots: bool,
}

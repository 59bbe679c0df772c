//! Test utilities for creating temporary directory trees.
//!
//! This module is only compiled for tests and benchmarks.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory tree for testing.
///
/// The tree is removed when dropped. Directories locked with `lock_dir`
/// get their permissions back first so cleanup can succeed.
pub struct TestTree {
    dir: TempDir,
    locked: RefCell<Vec<PathBuf>>,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            dir,
            locked: RefCell::new(Vec::new()),
        }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add an (empty) directory and any missing parents.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Build a uniform tree: every directory above `depth` gets `width`
    /// subdirectories, and every subdirectory holds one file.
    pub fn populate(&self, width: usize, depth: usize) {
        fn fill(dir: &Path, width: usize, depth: usize) {
            if depth == 0 {
                return;
            }
            for i in 0..width {
                let sub = dir.join(format!("dir{}", i));
                fs::create_dir_all(&sub).expect("Failed to create dir");
                fs::write(sub.join(format!("file{}.txt", i)), "content")
                    .expect("Failed to write file");
                fill(&sub, width, depth - 1);
            }
        }
        fill(self.dir.path(), width, depth);
    }

    /// Remove all permissions from a directory.
    ///
    /// Returns whether the directory is now actually unlistable; it stays
    /// listable when running as a user that bypasses permission checks.
    #[cfg(unix)]
    pub fn lock_dir(&self, path: &str) -> bool {
        use std::os::unix::fs::PermissionsExt;

        let full_path = self.dir.path().join(path);
        let mut perms = fs::metadata(&full_path)
            .expect("Failed to stat dir")
            .permissions();
        perms.set_mode(0o000);
        fs::set_permissions(&full_path, perms).expect("Failed to set permissions");
        let locked = fs::read_dir(&full_path).is_err();
        self.locked.borrow_mut().push(full_path);
        locked
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestTree {
    fn drop(&mut self) {
        #[cfg(unix)]
        for path in self.locked.borrow().iter() {
            use std::os::unix::fs::PermissionsExt;

            let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o755));
        }
    }
}

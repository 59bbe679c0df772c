//! Test harness for dirsnap integration tests

use std::path::Path;
use std::process::Command;

use serde_json::Value;

pub use dirsnap::test_utils::TestTree;

pub fn run_dirsnap(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = env!("CARGO_BIN_EXE_dirsnap");
    let output = Command::new(binary)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run dirsnap");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

/// Run dirsnap and parse its stdout as JSON.
pub fn snapshot(dir: &Path, args: &[&str]) -> (Value, String) {
    let (stdout, stderr, success) = run_dirsnap(dir, args);
    assert!(success, "dirsnap should succeed: {}", stderr);
    let value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout should be JSON ({}): {}", e, stdout));
    (value, stderr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_creates_temp_dir() {
        let tree = TestTree::new();
        assert!(tree.path().exists());
    }

    #[test]
    fn test_harness_add_file() {
        let tree = TestTree::new();
        let file_path = tree.add_file("nested/test.txt", "content");
        assert!(file_path.exists());
    }
}

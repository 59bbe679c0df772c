//! JSON output formatting

use std::collections::BTreeMap;
use std::io;

use crate::tree::TreeNode;

/// Render the root mapping as pretty-printed JSON (two-space indent, sorted keys).
pub fn render(roots: &BTreeMap<String, TreeNode>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(roots)
}

/// Print the root mapping as pretty-printed JSON to stdout.
pub fn print_json(roots: &BTreeMap<String, TreeNode>) -> io::Result<()> {
    let json = render(roots).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

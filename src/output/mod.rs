//! Snapshot output
//!
//! The snapshot is rendered as one JSON document with keys in sorted order.

mod json;

pub use json::{print_json, render};

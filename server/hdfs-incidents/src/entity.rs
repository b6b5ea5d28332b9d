//! Block-id extraction from log messages.

use std::sync::LazyLock;

use regex::Regex;

/// `blk_` followed by digits; HDFS also emits negative ids (`blk_-160899...`).
static BLOCK_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"blk_-?[0-9]+").expect("block pattern is a valid regex"));

/// Return the leftmost block id in `message`, if any.
pub fn extract_block_id(message: &str) -> Option<String> {
  BLOCK_PATTERN.find(message).map(|m| m.as_str().to_string())
}

//! Core types for the incident builder (JSON contracts + internal models).

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Parsed records (JSON contract of the parse stage)
// ---------------------------------------------------------------------------

/// One successfully parsed log line. Unknown fields are silently ignored on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
  pub line_number: usize,
  /// Naive wall-clock time; no timezone is recorded in the source logs.
  pub timestamp: NaiveDateTime,
  pub thread_id: String,
  pub level: String,
  pub component: String,
  pub message: String,
  #[serde(default)]
  pub block_id: Option<String>,
  #[serde(default)]
  pub raw_line: String,
}

impl LogRecord {
  /// Attach the correlation key found in the message.
  pub fn with_block_id(mut self, block_id: Option<String>) -> Self {
    self.block_id = block_id;
    self
  }
}

// ---------------------------------------------------------------------------
// Parse failures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
  /// Blank after trimming.
  Empty,
  /// Header does not follow `<date> <time> <thread> <level> <component>: <message>`.
  Grammar,
  /// Header matched but date or time is not a real calendar instant.
  InvalidTimestamp,
}

impl fmt::Display for FailureReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Empty => "empty line",
      Self::Grammar => "does not match log grammar",
      Self::InvalidTimestamp => "invalid date/time",
    };
    f.write_str(s)
  }
}

/// A malformed line. Only counted and logged, never written to the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
  pub line_number: usize,
  pub reason: FailureReason,
  /// First 100 characters of the offending line.
  pub excerpt: String,
}

impl ParseFailure {
  pub fn new(line_number: usize, reason: FailureReason, line: &str) -> Self {
    Self {
      line_number,
      reason,
      excerpt: line.chars().take(100).collect(),
    }
  }
}

impl fmt::Display for ParseFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "line {}: {}: {}", self.line_number, self.reason, self.excerpt)
  }
}

impl std::error::Error for ParseFailure {}

// ---------------------------------------------------------------------------
// Severity ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
  Debug,
  Info,
  Warn,
  Error,
  Fatal,
}

impl Severity {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.to_ascii_lowercase().as_str() {
      "debug" | "trace" => Some(Self::Debug),
      "info" => Some(Self::Info),
      "warn" | "warning" => Some(Self::Warn),
      "error" | "err" => Some(Self::Error),
      "fatal" | "critical" => Some(Self::Fatal),
      _ => None,
    }
  }
}

// ---------------------------------------------------------------------------
// Incidents (JSON contract of the group stage)
// ---------------------------------------------------------------------------

/// Records sharing one block id whose consecutive timestamps stay within the window.
///
/// Derived fields are computed once from the members; there is no way to set
/// them independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Incident {
  incident_id: String,
  block_id: String,
  start_time: NaiveDateTime,
  end_time: NaiveDateTime,
  duration_seconds: i64,
  size: usize,
  severity: String,
  components: Vec<String>,
  records: Vec<LogRecord>,
}

impl Incident {
  /// Build from a non-empty, timestamp-sorted member list.
  ///
  /// Returns `None` for an empty list.
  pub(crate) fn from_sorted(block_id: String, records: Vec<LogRecord>) -> Option<Self> {
    let start_time = records.first()?.timestamp;
    let end_time = records.last()?.timestamp;

    // Unknown levels (None) rank lowest. First record wins ties, so iterate
    // in reverse with max_by_key.
    let severity = records
      .iter()
      .rev()
      .max_by_key(|r| Severity::from_str_loose(&r.level))
      .map(|r| r.level.clone())
      .unwrap_or_default();

    let components: Vec<String> = records
      .iter()
      .map(|r| r.component.clone())
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect();

    Some(Self {
      incident_id: incident_id(&block_id, &start_time),
      block_id,
      start_time,
      end_time,
      duration_seconds: (end_time - start_time).num_seconds(),
      size: records.len(),
      severity,
      components,
      records,
    })
  }

  pub fn incident_id(&self) -> &str {
    &self.incident_id
  }

  pub fn block_id(&self) -> &str {
    &self.block_id
  }

  pub fn start_time(&self) -> NaiveDateTime {
    self.start_time
  }

  pub fn end_time(&self) -> NaiveDateTime {
    self.end_time
  }

  pub fn duration_seconds(&self) -> i64 {
    self.duration_seconds
  }

  pub fn size(&self) -> usize {
    self.size
  }

  pub fn severity(&self) -> &str {
    &self.severity
  }

  pub fn components(&self) -> &[String] {
    &self.components
  }

  pub fn records(&self) -> &[LogRecord] {
    &self.records
  }
}

/// Stable incident ID: hash of block id + start time.
fn incident_id(block_id: &str, start_time: &NaiveDateTime) -> String {
  let mut hasher = blake3::Hasher::new();
  hasher.update(block_id.as_bytes());
  hasher.update(b"|");
  hasher.update(start_time.format("%Y-%m-%dT%H:%M:%S").to_string().as_bytes());
  let hex = hasher.finalize().to_hex();
  format!("inc-{}", &hex[..16])
}

//! Run-level statistics: parse counters and incident-set aggregates.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::types::Incident;

/// Counters for one pipeline invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
  pub attempted: usize,
  pub succeeded: usize,
  pub failed: usize,
}

impl ParseStats {
  pub fn record_success(&mut self) {
    self.attempted += 1;
    self.succeeded += 1;
  }

  pub fn record_failure(&mut self) {
    self.attempted += 1;
    self.failed += 1;
  }

  /// succeeded / attempted, 0 when nothing was attempted.
  pub fn success_rate(&self) -> f64 {
    if self.attempted == 0 {
      0.0
    } else {
      self.succeeded as f64 / self.attempted as f64
    }
  }
}

impl fmt::Display for ParseStats {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Parsing Summary:")?;
    writeln!(f, "  Total lines processed: {}", self.attempted)?;
    writeln!(f, "  Successfully parsed: {}", self.succeeded)?;
    writeln!(f, "  Failed to parse: {}", self.failed)?;
    write!(f, "  Success rate: {:.1}%", self.success_rate() * 100.0)
  }
}

/// Aggregates over a produced incident set. All zero for an empty set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IncidentStats {
  pub unique_block_ids: usize,
  pub total_incidents: usize,
  pub total_records: usize,
  pub avg_records_per_incident: f64,
  pub min_records_per_incident: usize,
  pub max_records_per_incident: usize,
  pub avg_duration_seconds: f64,
  pub severity_distribution: BTreeMap<String, usize>,
}

/// Summarize an incident set.
pub fn summarize(incidents: &[Incident]) -> IncidentStats {
  if incidents.is_empty() {
    return IncidentStats::default();
  }

  let count = incidents.len();
  let total_records: usize = incidents.iter().map(Incident::size).sum();
  let total_duration: i64 = incidents.iter().map(Incident::duration_seconds).sum();
  let unique_block_ids = incidents
    .iter()
    .map(Incident::block_id)
    .collect::<BTreeSet<_>>()
    .len();

  let mut severity_distribution = BTreeMap::new();
  for inc in incidents {
    *severity_distribution
      .entry(inc.severity().to_string())
      .or_insert(0) += 1;
  }

  IncidentStats {
    unique_block_ids,
    total_incidents: count,
    total_records,
    avg_records_per_incident: total_records as f64 / count as f64,
    min_records_per_incident: incidents.iter().map(Incident::size).min().unwrap_or(0),
    max_records_per_incident: incidents.iter().map(Incident::size).max().unwrap_or(0),
    avg_duration_seconds: total_duration as f64 / count as f64,
    severity_distribution,
  }
}

impl fmt::Display for IncidentStats {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Incident Summary:")?;
    writeln!(f, "  Unique block IDs found: {}", self.unique_block_ids)?;
    writeln!(f, "  Incidents created: {}", self.total_incidents)?;
    writeln!(f, "  Average records per incident: {:.1}", self.avg_records_per_incident)?;
    writeln!(
      f,
      "  Incident size range: {} - {}",
      self.min_records_per_incident, self.max_records_per_incident
    )?;
    write!(f, "  Average duration: {:.1}s", self.avg_duration_seconds)
  }
}

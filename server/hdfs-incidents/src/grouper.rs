//! Group parsed records into incidents by block id and time proximity.
//!
//! Within one block id, a record joins the open incident when its gap to the
//! previous record is at most the window; otherwise a new incident starts.

use std::collections::HashMap;

use chrono::Duration;
use tracing::info;

use crate::error::IncidentError;
use crate::types::{Incident, LogRecord};

#[derive(Debug, Clone)]
pub struct IncidentGrouper {
  window: Duration,
}

impl IncidentGrouper {
  /// Fails with `InvalidWindow` unless `window_minutes` is positive.
  pub fn new(window_minutes: i64) -> Result<Self, IncidentError> {
    if window_minutes <= 0 {
      return Err(IncidentError::invalid_window(window_minutes));
    }
    let window =
      Duration::try_minutes(window_minutes).ok_or_else(|| IncidentError::invalid_window(window_minutes))?;
    Ok(Self { window })
  }

  /// Group records in any order. Records without a block id are ignored.
  ///
  /// Output is ordered by `start_time`, then `block_id`.
  pub fn group(&self, records: &[LogRecord]) -> Vec<Incident> {
    // Stable partition: first-seen order of block ids, input order within each.
    let mut order: Vec<&str> = Vec::new();
    let mut partitions: HashMap<&str, Vec<&LogRecord>> = HashMap::new();
    for record in records {
      let Some(block_id) = record.block_id.as_deref() else {
        continue;
      };
      partitions
        .entry(block_id)
        .or_insert_with(|| {
          order.push(block_id);
          Vec::new()
        })
        .push(record);
    }

    let with_blocks: usize = partitions.values().map(Vec::len).sum();
    info!(
      records = with_blocks,
      unique_block_ids = partitions.len(),
      "grouping records with block ids into incidents"
    );

    let mut incidents = Vec::new();
    for block_id in order {
      let Some(mut members) = partitions.remove(block_id) else {
        continue;
      };
      // Stable: equal timestamps keep input order.
      members.sort_by_key(|r| r.timestamp);
      self.split_partition(block_id, &members, &mut incidents);
    }

    incidents.sort_by(|a, b| {
      a.start_time()
        .cmp(&b.start_time())
        .then_with(|| a.block_id().cmp(b.block_id()))
    });

    info!(incidents = incidents.len(), records = with_blocks, "incident grouping complete");
    incidents
  }

  /// Scan one time-sorted partition, closing an incident whenever a gap exceeds the window.
  fn split_partition(&self, block_id: &str, members: &[&LogRecord], out: &mut Vec<Incident>) {
    let mut current: Vec<LogRecord> = Vec::new();

    for record in members {
      if let Some(prev) = current.last() {
        if record.timestamp - prev.timestamp > self.window {
          let closed = std::mem::take(&mut current);
          out.extend(Incident::from_sorted(block_id.to_string(), closed));
        }
      }
      current.push((*record).clone());
    }

    out.extend(Incident::from_sorted(block_id.to_string(), current));
  }
}

/// Group `records` with a window of `window_minutes`.
pub fn group(records: &[LogRecord], window_minutes: i64) -> Result<Vec<Incident>, IncidentError> {
  Ok(IncidentGrouper::new(window_minutes)?.group(records))
}

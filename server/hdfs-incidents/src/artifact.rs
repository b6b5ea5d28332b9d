//! JSON artifacts: the parsed-records file and the incidents file.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::IncidentError;
use crate::types::{Incident, LogRecord};

/// Write `items` as a pretty-printed JSON array, creating parent directories.
pub fn save_json<T: Serialize>(path: &Path, items: &[T]) -> Result<(), IncidentError> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(|e| IncidentError::io(parent, e))?;
  }
  let file = File::create(path).map_err(|e| IncidentError::io(path, e))?;
  let mut out = BufWriter::new(file);
  serde_json::to_writer_pretty(&mut out, items)?;
  writeln!(out).map_err(|e| IncidentError::io(path, e))?;
  out.flush().map_err(|e| IncidentError::io(path, e))?;
  info!(path = %path.display(), count = items.len(), "saved artifact");
  Ok(())
}

/// Load a parsed-records artifact.
pub fn load_records(path: &Path) -> Result<Vec<LogRecord>, IncidentError> {
  let file = File::open(path).map_err(|e| IncidentError::io(path, e))?;
  let records: Vec<LogRecord> = serde_json::from_reader(BufReader::new(file))?;
  info!(path = %path.display(), count = records.len(), "loaded parsed records");
  Ok(records)
}

/// JSON view of an incident with the member list replaced by a placeholder.
pub fn elide_records(incident: &Incident) -> Result<serde_json::Value, IncidentError> {
  let mut value = serde_json::to_value(incident)?;
  if let Some(obj) = value.as_object_mut() {
    obj.insert(
      "records".into(),
      serde_json::Value::String(format!("[{} records...]", incident.size())),
    );
  }
  Ok(value)
}

/// `<dir>/parsed_logs_<count>.json`
pub fn parsed_logs_path(dir: &Path, count: usize) -> PathBuf {
  dir.join(format!("parsed_logs_{}.json", count))
}

/// `<dir>/incidents_<count>.json`
pub fn incidents_path(dir: &Path, count: usize) -> PathBuf {
  dir.join(format!("incidents_{}.json", count))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser::LineParser;

  #[test]
  fn records_survive_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let rec = LineParser::default()
      .parse_line("081109 203518 143 INFO dfs.DataNode: Receiving block blk_1", 1)
      .unwrap()
      .with_block_id(Some("blk_1".into()));
    let path = parsed_logs_path(&dir.path().join("nested"), 1);

    save_json(&path, std::slice::from_ref(&rec)).unwrap();
    let loaded = load_records(&path).unwrap();
    assert_eq!(loaded, vec![rec]);
  }

  #[test]
  fn load_tolerates_missing_optional_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("parsed.json");
    fs::write(
      &path,
      r#"[{"line_number":1,"timestamp":"2008-11-09T20:35:18","thread_id":"143",
          "level":"INFO","component":"dfs.DataNode","message":"hello","extra":true}]"#,
    )
    .unwrap();
    let loaded = load_records(&path).unwrap();
    assert_eq!(loaded[0].block_id, None);
    assert_eq!(loaded[0].raw_line, "");
  }

  #[test]
  fn malformed_json_is_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{not json").unwrap();
    assert!(matches!(load_records(&path), Err(IncidentError::Json(_))));
  }

  #[test]
  fn elided_incident_keeps_summary_fields() {
    let parser = LineParser::default();
    let records: Vec<LogRecord> = [
      "081109 203518 143 INFO dfs.DataNode: Receiving block blk_1",
      "081109 203520 143 ERROR dfs.DataNode: Error on block blk_1",
    ]
    .iter()
    .enumerate()
    .map(|(i, line)| {
      parser
        .parse_line(line, i + 1)
        .unwrap()
        .with_block_id(Some("blk_1".into()))
    })
    .collect();
    let incidents = crate::grouper::group(&records, 5).unwrap();

    let view = elide_records(&incidents[0]).unwrap();
    assert_eq!(view["records"], "[2 records...]");
    assert_eq!(view["block_id"], "blk_1");
    assert_eq!(view["size"], 2);
    assert_eq!(view["severity"], "ERROR");
  }

  #[test]
  fn artifact_names_include_count() {
    let dir = Path::new("data");
    assert_eq!(parsed_logs_path(dir, 1000), Path::new("data/parsed_logs_1000.json"));
    assert_eq!(incidents_path(dir, 42), Path::new("data/incidents_42.json"));
  }
}

//! Parse raw HDFS log lines into structured LogRecords.
//!
//! Expected layout (LogHub HDFS):
//! `081109 203518 143 INFO dfs.DataNode$DataXceiver: Receiving block blk_-1608999687919862906`

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::config::Config;
use crate::types::{FailureReason, LogRecord, ParseFailure};

/// Header tokens are whitespace-delimited; the component ends at the first colon.
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^([0-9]+)\s+([0-9]+)\s+(\S+)\s+(\w+)\s+([^\s:]+):\s+(.+)$")
    .expect("line pattern is a valid regex")
});

#[derive(Debug, Clone)]
pub struct LineParser {
  century: i32,
}

impl Default for LineParser {
  fn default() -> Self {
    Self::from_config(&Config::default())
  }
}

impl LineParser {
  pub fn new(century: i32) -> Self {
    Self { century }
  }

  pub fn from_config(config: &Config) -> Self {
    Self::new(config.century)
  }

  /// Parse one line. The returned record has no `block_id` yet.
  pub fn parse_line(&self, line: &str, line_number: usize) -> Result<LogRecord, ParseFailure> {
    let line = line.trim();
    if line.is_empty() {
      return Err(ParseFailure::new(line_number, FailureReason::Empty, line));
    }

    let caps = LINE_PATTERN
      .captures(line)
      .ok_or_else(|| ParseFailure::new(line_number, FailureReason::Grammar, line))?;

    let timestamp = self
      .parse_timestamp(&caps[1], &caps[2])
      .ok_or_else(|| ParseFailure::new(line_number, FailureReason::InvalidTimestamp, line))?;

    Ok(LogRecord {
      line_number,
      timestamp,
      thread_id: caps[3].to_string(),
      level: caps[4].to_string(),
      component: caps[5].to_string(),
      message: caps[6].to_string(),
      block_id: None,
      raw_line: line.to_string(),
    })
  }

  /// `YYMMDD` (anchored to the century) or `YYYYMMDD`, plus `HHMMSS`.
  fn parse_timestamp(&self, date: &str, time: &str) -> Option<NaiveDateTime> {
    let (year, rest) = match date.len() {
      6 => (self.century.checked_add(date[..2].parse::<i32>().ok()?)?, &date[2..]),
      8 => (date[..4].parse::<i32>().ok()?, &date[4..]),
      _ => return None,
    };
    let month: u32 = rest[..2].parse().ok()?;
    let day: u32 = rest[2..].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    if time.len() != 6 {
      return None;
    }
    let hour: u32 = time[..2].parse().ok()?;
    let minute: u32 = time[2..4].parse().ok()?;
    let second: u32 = time[4..].parse().ok()?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;

    Some(date.and_time(time))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const LINE: &str = "081109 203518 143 INFO dfs.DataNode$DataXceiver: Receiving block blk_-1608999687919862906 src: /10.250.19.102:54106 dest: /10.250.19.102:50010";

  fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
      .unwrap()
      .and_hms_opt(h, mi, s)
      .unwrap()
  }

  #[test]
  fn parses_well_formed_line() {
    let rec = LineParser::default().parse_line(LINE, 1).unwrap();
    assert_eq!(rec.line_number, 1);
    assert_eq!(rec.timestamp, ts(2008, 11, 9, 20, 35, 18));
    assert_eq!(rec.thread_id, "143");
    assert_eq!(rec.level, "INFO");
    assert_eq!(rec.component, "dfs.DataNode$DataXceiver");
    assert!(rec.message.starts_with("Receiving block blk_-1608999687919862906 src:"));
    assert!(rec.block_id.is_none());
    assert_eq!(rec.raw_line, LINE);
  }

  #[test]
  fn tolerates_extra_whitespace_between_fields() {
    let line = "  081109   203518\t143  WARN   dfs.DataNode:   lost connection  ";
    let rec = LineParser::default().parse_line(line, 3).unwrap();
    assert_eq!(rec.level, "WARN");
    assert_eq!(rec.component, "dfs.DataNode");
    assert_eq!(rec.message, "lost connection");
  }

  #[test]
  fn level_case_is_preserved() {
    let line = "081109 203518 143 Info dfs.DataNode: hello";
    let rec = LineParser::default().parse_line(line, 1).unwrap();
    assert_eq!(rec.level, "Info");
  }

  #[test]
  fn four_digit_year_is_accepted() {
    let line = "20081109 203518 143 INFO dfs.DataNode: hello";
    let rec = LineParser::default().parse_line(line, 1).unwrap();
    assert_eq!(rec.timestamp, ts(2008, 11, 9, 20, 35, 18));
  }

  #[test]
  fn century_comes_from_config() {
    let parser = LineParser::new(1900);
    let rec = parser.parse_line(LINE, 1).unwrap();
    assert_eq!(rec.timestamp, ts(1908, 11, 9, 20, 35, 18));
  }

  #[test]
  fn out_of_range_century_is_invalid_timestamp() {
    for century in [i32::MAX, i32::MIN] {
      let err = LineParser::new(century).parse_line(LINE, 1).unwrap_err();
      assert_eq!(err.reason, FailureReason::InvalidTimestamp);
    }
  }

  #[test]
  fn empty_line_is_malformed() {
    let err = LineParser::default().parse_line("   ", 9).unwrap_err();
    assert_eq!(err.reason, FailureReason::Empty);
    assert_eq!(err.line_number, 9);
  }

  #[test]
  fn missing_component_colon_is_malformed() {
    let line = "081109 203518 143 INFO dfs.DataNode$PacketResponder Received block blk_123 src: /10.0.0.1:50010";
    let err = LineParser::default().parse_line(line, 2).unwrap_err();
    assert_eq!(err.reason, FailureReason::Grammar);
  }

  #[test]
  fn truncated_line_is_malformed() {
    for line in ["081109", "081109 203518", "081109 203518 143 INFO", "081109 203518 143 INFO dfs.DataNode:"] {
      let err = LineParser::default().parse_line(line, 1).unwrap_err();
      assert_eq!(err.reason, FailureReason::Grammar, "line {:?}", line);
    }
  }

  #[test]
  fn invalid_calendar_values_are_malformed() {
    for line in [
      "081309 203518 143 INFO dfs.DataNode: month 13",
      "080230 203518 143 INFO dfs.DataNode: feb 30",
      "081109 253518 143 INFO dfs.DataNode: hour 25",
      "081109 206118 143 INFO dfs.DataNode: minute 61",
      "0811 203518 143 INFO dfs.DataNode: short date",
      "081109 2035 143 INFO dfs.DataNode: short time",
    ] {
      let err = LineParser::default().parse_line(line, 1).unwrap_err();
      assert_eq!(err.reason, FailureReason::InvalidTimestamp, "line {:?}", line);
    }
  }

  #[test]
  fn non_numeric_date_is_grammar_failure() {
    let err = LineParser::default()
      .parse_line("2008-11-09 20:35:18 143 INFO dfs.DataNode: iso dates", 1)
      .unwrap_err();
    assert_eq!(err.reason, FailureReason::Grammar);
  }
}

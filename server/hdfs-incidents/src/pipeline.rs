//! Drive the line parser and block-id extractor over an input stream.
//!
//! Malformed lines are counted and skipped; only I/O on the source itself can
//! fail a run. Output keeps input order.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::entity;
use crate::error::IncidentError;
use crate::parser::LineParser;
use crate::stats::ParseStats;
use crate::types::{LogRecord, ParseFailure};

/// Everything one parse run produced.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
  /// Parsed records in input order.
  pub records: Vec<LogRecord>,
  pub failures: Vec<ParseFailure>,
  pub stats: ParseStats,
}

impl ParseOutcome {
  /// Fold one line into the outcome.
  fn push_line(&mut self, parser: &LineParser, line: &str, line_number: usize) {
    match parser.parse_line(line, line_number) {
      Ok(record) => {
        let block_id = entity::extract_block_id(&record.message);
        self.records.push(record.with_block_id(block_id));
        self.stats.record_success();
      }
      Err(failure) => {
        warn!(
          line = failure.line_number,
          reason = %failure.reason,
          "failed to parse line: {}",
          failure.excerpt
        );
        self.failures.push(failure);
        self.stats.record_failure();
      }
    }
  }

  fn finish(self) -> Self {
    info!(
      attempted = self.stats.attempted,
      succeeded = self.stats.succeeded,
      failed = self.stats.failed,
      "parse complete"
    );
    if self.stats.attempted > 0 && self.stats.failed == self.stats.attempted {
      warn!("no line matched the log grammar; check the input format");
    }
    self
  }
}

/// Zero means unbounded.
fn line_bound(limit: Option<usize>) -> usize {
  limit.filter(|&n| n > 0).unwrap_or(usize::MAX)
}

/// Parse in-memory lines. `limit` of `None` or `Some(0)` means all lines.
pub fn parse_lines<I, S>(lines: I, limit: Option<usize>, parser: &LineParser) -> ParseOutcome
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut outcome = ParseOutcome::default();
  for (idx, line) in lines.into_iter().take(line_bound(limit)).enumerate() {
    outcome.push_line(parser, line.as_ref(), idx + 1);
  }
  outcome.finish()
}

/// Parse a buffered stream. Invalid UTF-8 is replaced rather than rejected.
pub fn parse_reader<R: BufRead>(
  mut reader: R,
  limit: Option<usize>,
  parser: &LineParser,
) -> Result<ParseOutcome, IncidentError> {
  let mut outcome = ParseOutcome::default();
  let mut buf = Vec::new();
  let bound = line_bound(limit);
  let mut line_number = 0;

  // Stop before touching the source once the bound is met.
  while line_number < bound {
    buf.clear();
    if reader.read_until(b'\n', &mut buf)? == 0 {
      break;
    }
    line_number += 1;
    let line = String::from_utf8_lossy(&buf);
    outcome.push_line(parser, &line, line_number);
  }

  Ok(outcome.finish())
}

/// Parse a log file using the config's century and line limit.
pub fn parse_file(path: &Path, config: &Config) -> Result<ParseOutcome, IncidentError> {
  debug!(path = %path.display(), limit = ?config.effective_limit(), "parsing log file");
  let file = File::open(path).map_err(|e| IncidentError::io(path, e))?;
  let parser = LineParser::from_config(config);
  parse_reader(BufReader::new(file), config.effective_limit(), &parser)
}

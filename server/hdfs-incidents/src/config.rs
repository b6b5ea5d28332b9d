//! Pipeline configuration with sane defaults.

/// Tunable knobs for parsing and grouping.
#[derive(Debug, Clone)]
pub struct Config {
  /// Max gap in minutes between consecutive records of one incident.
  pub window_minutes: i64,
  /// Year added to two-digit `YYMMDD` dates (LogHub HDFS logs are from 2008).
  pub century: i32,
  /// Read at most this many lines; `None` or `Some(0)` reads everything.
  pub line_limit: Option<usize>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      window_minutes: 5,
      century: 2000,
      line_limit: None,
    }
  }
}

impl Config {
  /// Effective line bound; zero means unbounded.
  pub fn effective_limit(&self) -> Option<usize> {
    self.line_limit.filter(|&n| n > 0)
  }
}

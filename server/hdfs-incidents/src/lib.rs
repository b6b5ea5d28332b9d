//! HDFS log incident builder — deterministic, rule-based batch pipeline.
//!
//! Parses LogHub-format HDFS log lines into structured records, extracts
//! block ids, and groups same-block records into time-bounded incidents
//! ready for downstream summarization.
//!
//! No AI, no DB, no network; pure computation over flat files.

pub mod artifact;
pub mod config;
pub mod entity;
pub mod error;
pub mod grouper;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod stats;
pub mod types;

pub use config::Config;
pub use error::IncidentError;
pub use grouper::{group, IncidentGrouper};
pub use parser::LineParser;
pub use pipeline::{parse_file, parse_lines, parse_reader, ParseOutcome};
pub use stats::{summarize, IncidentStats, ParseStats};
pub use types::{FailureReason, Incident, LogRecord, ParseFailure};

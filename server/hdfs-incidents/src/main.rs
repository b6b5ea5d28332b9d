//! Binary entrypoint: parse raw HDFS logs and/or group parsed records into incidents.
//!
//! - `parse`: raw log file -> `parsed_logs_<n>.json` + parse summary
//! - `group`: parsed records JSON -> `incidents_<n>.json` + incident summary
//! - `run`: both stages in one go
//!
//! Summaries go to stdout; logs go to stderr.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use hdfs_incidents::{
  artifact, logging, pipeline, stats, Config, Incident, IncidentError, IncidentGrouper, LogRecord,
};

#[derive(Parser)]
#[command(name = "hdfs-incidents", version, about = "Group HDFS log lines into block-level incidents")]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  cmd: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Parse a raw log file into structured records
  Parse(ParseArgs),
  /// Group parsed records into incidents
  Group(GroupArgs),
  /// Parse then group
  Run(RunArgs),
}

#[derive(Args)]
struct ParseArgs {
  /// Raw HDFS log file
  input: PathBuf,
  /// Parse at most this many lines (0 = all)
  #[arg(short, long)]
  limit: Option<usize>,
  /// Output path (default: parsed_logs_<n>.json next to the input)
  #[arg(short, long)]
  output: Option<PathBuf>,
  /// Year added to two-digit dates
  #[arg(long, default_value_t = Config::default().century)]
  century: i32,
}

#[derive(Args)]
struct GroupArgs {
  /// Parsed records JSON produced by `parse`
  input: PathBuf,
  /// Max minutes between consecutive records of one incident
  #[arg(short, long, default_value_t = Config::default().window_minutes, allow_negative_numbers = true)]
  window: i64,
  /// Output path (default: incidents_<n>.json next to the input)
  #[arg(short, long)]
  output: Option<PathBuf>,
}

#[derive(Args)]
struct RunArgs {
  /// Raw HDFS log file
  input: PathBuf,
  #[arg(short, long)]
  limit: Option<usize>,
  #[arg(short, long, default_value_t = Config::default().window_minutes, allow_negative_numbers = true)]
  window: i64,
  /// Directory for both artifacts (default: the input's directory)
  #[arg(long)]
  out_dir: Option<PathBuf>,
  #[arg(long, default_value_t = Config::default().century)]
  century: i32,
}

fn main() {
  let cli = Cli::parse();
  logging::init(cli.verbose);

  if let Err(e) = run_binary(cli.cmd) {
    let _ = writeln!(io::stderr(), "hdfs-incidents: {}", e);
    std::process::exit(1);
  }
}

fn run_binary(cmd: Command) -> Result<(), IncidentError> {
  match cmd {
    Command::Parse(args) => {
      let config = Config {
        century: args.century,
        line_limit: args.limit,
        ..Config::default()
      };
      let records = parse_stage(&args.input, &config, args.output, None)?;
      print_sample_record(&records)?;
    }
    Command::Group(args) => {
      let records = artifact::load_records(&args.input)?;
      let out_dir = parent_dir(&args.input);
      group_stage(&records, args.window, args.output, &out_dir)?;
    }
    Command::Run(args) => {
      let config = Config {
        window_minutes: args.window,
        century: args.century,
        line_limit: args.limit,
      };
      // Reject the window before doing any parsing work.
      IncidentGrouper::new(config.window_minutes)?;
      let out_dir = args.out_dir.unwrap_or_else(|| parent_dir(&args.input));
      let records = parse_stage(&args.input, &config, None, Some(&out_dir))?;
      group_stage(&records, config.window_minutes, None, &out_dir)?;
    }
  }
  Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
  path.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn parse_stage(
  input: &Path,
  config: &Config,
  output: Option<PathBuf>,
  out_dir: Option<&Path>,
) -> Result<Vec<LogRecord>, IncidentError> {
  let outcome = pipeline::parse_file(input, config)?;
  println!("{}", outcome.stats);

  let path = output.unwrap_or_else(|| {
    let dir = out_dir.map(Path::to_path_buf).unwrap_or_else(|| parent_dir(input));
    artifact::parsed_logs_path(&dir, outcome.records.len())
  });
  artifact::save_json(&path, &outcome.records)?;
  println!("Saved {} records to {}", outcome.records.len(), path.display());
  Ok(outcome.records)
}

fn group_stage(
  records: &[LogRecord],
  window_minutes: i64,
  output: Option<PathBuf>,
  out_dir: &Path,
) -> Result<(), IncidentError> {
  let grouper = IncidentGrouper::new(window_minutes)?;
  let incidents = grouper.group(records);
  let summary = stats::summarize(&incidents);
  println!("{}", summary);

  let path = output.unwrap_or_else(|| artifact::incidents_path(out_dir, incidents.len()));
  artifact::save_json(&path, &incidents)?;
  println!("Saved {} incidents to {}", incidents.len(), path.display());
  print_sample_incident(&incidents)?;
  Ok(())
}

fn print_sample_incident(incidents: &[Incident]) -> Result<(), IncidentError> {
  if let Some(first) = incidents.first() {
    println!("Sample incident:");
    println!("{}", serde_json::to_string_pretty(&artifact::elide_records(first)?)?);
  }
  Ok(())
}

fn print_sample_record(records: &[LogRecord]) -> Result<(), IncidentError> {
  if let Some(first) = records.first() {
    println!("Sample parsed record:");
    println!("{}", serde_json::to_string_pretty(first)?);
  }
  Ok(())
}

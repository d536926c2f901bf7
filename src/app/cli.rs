//! Command-line arguments for the stress driver

use clap::{ArgAction, Parser};
use std::path::PathBuf;

// Driver arguments: scenario selection, workload sizing, and logging flags.
#[derive(Parser, Debug, Clone)]
#[command(name = "taskchain")]
#[command(about = "Triple-buffered task-offload queue stress driver")]
#[command(version)]
pub struct Args {
    /// Scenarios to run (repeatable; defaults to all)
    #[arg(short = 's', long = "scenario", value_name = "NAME", action = ArgAction::Append, value_parser = [
        "high-volume",
        "rapid-swapping",
        "concurrent-submission",
        "empty-queue",
        "mixed-operations",
        "continuous",
    ])]
    pub scenarios: Vec<String>,

    /// Task count for the high-volume scenario
    #[arg(long = "tasks", value_name = "COUNT", default_value_t = 100_000)]
    pub tasks: usize,

    /// Producer threads for the concurrent-submission scenario
    #[arg(long = "producers", value_name = "COUNT", default_value_t = 10)]
    pub producers: usize,

    /// Tasks enqueued by each producer thread
    #[arg(long = "tasks-per-producer", value_name = "COUNT", default_value_t = 1000)]
    pub tasks_per_producer: usize,

    /// Runtime of the continuous scenario in seconds
    #[arg(long = "duration", value_name = "SECONDS", default_value_t = 5)]
    pub duration_secs: u64,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (console output when unset)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Color output control:
    /// --color=true forces color, --color=false disables it, unspecified = on
    #[arg(short = 'g', long = "color")]
    pub color: Option<bool>,

    /// Emit a JSON run report to stdout when finished
    #[arg(long = "report-json")]
    pub report_json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["taskchain"]).unwrap();

        assert!(args.scenarios.is_empty());
        assert_eq!(args.tasks, 100_000);
        assert_eq!(args.producers, 10);
        assert_eq!(args.tasks_per_producer, 1000);
        assert_eq!(args.duration_secs, 5);
        assert!(args.log_level.is_none());
        assert!(!args.report_json);
    }

    #[test]
    fn test_scenario_selection_is_repeatable() {
        let args = Args::try_parse_from([
            "taskchain",
            "--scenario",
            "empty-queue",
            "--scenario",
            "rapid-swapping",
        ])
        .unwrap();

        assert_eq!(args.scenarios, vec!["empty-queue", "rapid-swapping"]);
    }

    #[test]
    fn test_unknown_scenario_is_rejected() {
        let result = Args::try_parse_from(["taskchain", "--scenario", "warp-drive"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_logging_flags() {
        let args = Args::try_parse_from([
            "taskchain",
            "-l",
            "debug",
            "-o",
            "json",
            "-f",
            "/tmp/taskchain.log",
        ])
        .unwrap();

        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.log_format.as_deref(), Some("json"));
        assert_eq!(
            args.log_file.as_deref(),
            Some(std::path::Path::new("/tmp/taskchain.log"))
        );
    }
}

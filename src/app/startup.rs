//! Driver startup: logging initialization and scenario dispatch

use crate::app::cli::Args;
use crate::app::scenarios::{self, Scenario, ScenarioReport};
use crate::core::logging::init_logging;
use clap::Parser;
use serde::Serialize;
use strum::IntoEnumIterator;

#[derive(Debug, Serialize)]
struct RunReport {
    started_at: String,
    scenarios: Vec<ScenarioReport>,
}

/// Parse arguments, attach the logging sink, and run the selected scenarios.
///
/// Returns the process exit code.
pub fn run() -> i32 {
    let args = Args::parse();

    let color_enabled = args.color.unwrap_or(true);
    if let Err(err) = init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        args.log_file.as_deref(),
        color_enabled,
    ) {
        eprintln!("Failed to initialise logging: {err}");
        return 1;
    }

    let selected: Vec<Scenario> = if args.scenarios.is_empty() {
        Scenario::iter().collect()
    } else {
        let mut scenarios = Vec::with_capacity(args.scenarios.len());
        for name in &args.scenarios {
            match Scenario::from_name(name) {
                Some(scenario) => scenarios.push(scenario),
                None => {
                    log::error!("unknown scenario '{name}'");
                    return 1;
                }
            }
        }
        scenarios
    };

    let started_at = chrono::Local::now().to_rfc3339();
    log::info!("taskchain driver starting: {} scenario(s)", selected.len());

    let mut reports = Vec::new();
    for scenario in selected {
        match scenarios::run_scenario(scenario, &args) {
            Ok(report) => {
                log::info!(
                    "scenario {} completed: {} task(s) executed in {} ms",
                    report.name,
                    report.tasks_executed,
                    report.elapsed_ms
                );
                reports.push(report);
            }
            Err(err) => {
                log::error!("scenario {} failed: {err}", scenario.name());
                return 1;
            }
        }
    }

    if args.report_json {
        let report = RunReport {
            started_at,
            scenarios: reports,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => {
                log::error!("failed to render run report: {err}");
                return 1;
            }
        }
    }

    0
}

//! Dot product bandwidth benchmark.
//!
//! Usage:
//!   dotbench 1000000 10                      # plain strategy, 10 measurements
//!   dotbench --strategy unrolled 100000000 4
//!   dotbench --list                          # list strategies and kernels
//!   dotbench --help                          # show help

use dot_bench::cli::{parse_args, Command, RunArgs};
use dot_bench::harness::{self, CsvRecorder, TextReport};
use dot_bench::error::HarnessResult;
use dot_bench::tui;
use std::env;
use std::io;
use std::process::ExitCode;
use tracing::{error, info, Level};

fn main() -> ExitCode {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "dotbench".to_string());

    let run_args = match parse_args(args) {
        Ok(Command::Help) => {
            tui::print_help(&program);
            return ExitCode::SUCCESS;
        }
        Ok(Command::List) => {
            tui::print_available_variants();
            return ExitCode::SUCCESS;
        }
        Ok(Command::Run(run_args)) => run_args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", tui::usage_line(&program));
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(if run_args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match execute(&run_args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(run_args: &RunArgs) -> HarnessResult<()> {
    let report = TextReport::new(io::stdout().lock());

    match &run_args.csv_path {
        None => {
            let mut sink = report;
            harness::run(&run_args.config, &run_args.fixture, &mut sink)?;
        }
        Some(path) => {
            let mut sink = (report, CsvRecorder::new(&run_args.config));
            harness::run(&run_args.config, &run_args.fixture, &mut sink)?;
            let (_, recorder) = sink;
            recorder.export(path)?;
            info!(rows = recorder.len(), path = %path.display(), "exported samples");
        }
    }

    Ok(())
}

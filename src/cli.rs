//! Command-line parsing.
//!
//! Usage:
//!   dotbench [OPTIONS] <vector_size> <num_measurements>
//!   dotbench --list
//!   dotbench --help

use crate::harness::{Fixture, HarnessConfig};
use crate::reduction::{Implementation, RemainderPolicy, Strategy};
use std::path::PathBuf;
use thiserror::Error;

/// Usage errors. The binary prints the message and the usage line and
/// exits with status 1 without allocating anything.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CliError {
    #[error("expected 2 positional arguments (vector size, number of measurements), got {found}")]
    WrongArgumentCount { found: usize },

    #[error("invalid {what}: '{value}'")]
    InvalidNumber { what: &'static str, value: String },

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("option {0} requires a value")]
    MissingValue(String),

    #[error("unknown strategy '{0}' (expected plain, unrolled or blas)")]
    UnknownStrategy(String),

    #[error("unknown implementation '{0}' (expected rust or c)")]
    UnknownImplementation(String),
}

/// Everything a benchmark run needs from the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct RunArgs {
    pub config: HarnessConfig,
    pub fixture: Fixture,
    pub csv_path: Option<PathBuf>,
    pub verbose: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Help,
    List,
    Run(RunArgs),
}

/// Parse the arguments that follow the program name.
pub fn parse_args<I, S>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();

    let mut config = HarnessConfig::default();
    let mut fixture = Fixture::default();
    let mut csv_path = None;
    let mut verbose = false;
    let mut positional: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--help" | "-h" => return Ok(Command::Help),
            "--list" | "-l" => return Ok(Command::List),
            "--verbose" | "-v" => verbose = true,
            "--pin" => config.pin = true,
            "--keep-remainder" => config.remainder = RemainderPolicy::Keep,
            "--drop-remainder" => config.remainder = RemainderPolicy::Drop,
            "--strategy" | "-s" => {
                let value = value_of(&args, &mut i)?;
                config.strategy = value
                    .parse()
                    .map_err(|_| CliError::UnknownStrategy(value.to_string()))?;
            }
            "--impl" => {
                let value = value_of(&args, &mut i)?;
                config.implementation = value
                    .parse::<Implementation>()
                    .map_err(|_| CliError::UnknownImplementation(value.to_string()))?;
            }
            "--threshold" => {
                config.threshold = parse_number(value_of(&args, &mut i)?, "threshold")?;
            }
            "--fill" => {
                let value = value_of(&args, &mut i)?;
                let fill: f32 = value.parse().map_err(|_| CliError::InvalidNumber {
                    what: "fill value",
                    value: value.to_string(),
                })?;
                fixture = Fixture::Constant(fill);
            }
            "--random" => {
                let seed = parse_number(value_of(&args, &mut i)?, "seed")?;
                fixture = Fixture::Random { seed };
            }
            "--csv" => {
                csv_path = Some(PathBuf::from(value_of(&args, &mut i)?));
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(CliError::UnknownOption(arg.to_string()));
            }
            _ => positional.push(arg),
        }
        i += 1;
    }

    let &[vector_size, measurements] = positional.as_slice() else {
        return Err(CliError::WrongArgumentCount {
            found: positional.len(),
        });
    };

    config.vector_len = parse_number(vector_size, "vector size")?;
    config.iterations = parse_number(measurements, "number of measurements")?;

    Ok(Command::Run(RunArgs {
        config,
        fixture,
        csv_path,
        verbose,
    }))
}

fn value_of<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str, CliError> {
    let option = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| CliError::MissingValue(option.clone()))
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &'static str) -> Result<T, CliError> {
    value.trim().parse().map_err(|_| CliError::InvalidNumber {
        what,
        value: value.to_string(),
    })
}

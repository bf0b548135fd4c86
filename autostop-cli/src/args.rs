//! Command-line parsing and exit codes
//!
//! Exit codes:
//! - `0` success, `--help`, `--version`
//! - `1` malformed arguments or a fatal failure during the run
//! - `2` `-t/--time` missing (checked before any network call)

use autostop_core::config::{RunConfig, Settings, DEFAULT_PORT};
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::fmt;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_USAGE: i32 = 1;
pub const EXIT_MISSING_TIME: i32 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "autostop",
    version,
    about = "Checks if a notebook is idle for X seconds and, if it is, stops the notebook",
    after_help = "Usage:\n  autostop --time <time_in_seconds> [--port <jupyter_port>] [--ignore-connections]"
)]
pub struct Cli {
    /// Auto stop time in seconds
    #[arg(short = 't', long = "time", value_name = "SECONDS")]
    pub time: Option<u64>,

    /// Jupyter port
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Stop notebook once idle, ignore connected users
    #[arg(short = 'c', long)]
    pub ignore_connections: bool,

    /// Optional TOML settings file (paths, region, Jupyter client)
    #[arg(long, env = "AUTOSTOP_CONFIG", value_name = "FILE")]
    pub config: Option<String>,
}

/// Validated invocation; `threshold_seconds` is always positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub threshold_seconds: u64,
    pub port: u16,
    pub ignore_connections: bool,
    pub config: Option<String>,
}

impl Invocation {
    pub fn into_run_config(self, settings: Settings) -> RunConfig {
        RunConfig::new(
            self.threshold_seconds,
            self.port,
            self.ignore_connections,
            settings,
        )
    }
}

#[derive(Debug)]
pub enum ArgsError {
    /// `--help` or `--version` output.
    Info(String),
    Usage(String),
    MissingTime,
}

impl ArgsError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ArgsError::Info(_) => EXIT_SUCCESS,
            ArgsError::Usage(_) => EXIT_USAGE,
            ArgsError::MissingTime => EXIT_MISSING_TIME,
        }
    }

    /// Print to stdout for informational output, stderr otherwise.
    pub fn report(&self) {
        match self {
            ArgsError::Info(text) => print!("{}", text),
            other => eprintln!("{}", other),
        }
    }
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::Info(text) | ArgsError::Usage(text) => f.write_str(text.trim_end()),
            ArgsError::MissingTime => f.write_str("Missing '-t' or '--time'"),
        }
    }
}

impl std::error::Error for ArgsError {}

pub fn parse_args<I, T>(args: I) -> Result<Invocation, ArgsError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            ArgsError::Info(e.render().to_string())
        }
        _ => ArgsError::Usage(e.render().to_string()),
    })?;

    // A zero threshold would stop any notebook immediately; treat it as unset.
    let threshold_seconds = match cli.time {
        Some(t) if t > 0 => t,
        _ => return Err(ArgsError::MissingTime),
    };

    Ok(Invocation {
        threshold_seconds,
        port: cli.port,
        ignore_connections: cli.ignore_connections,
        config: cli.config,
    })
}

use crate::cli::{Args, FormatSelection, LogFormat};
use crate::client::HttpExecutor;
use anyhow::{Context, Result};
use clap::Parser;
use sparcheck::{CheckEvaluator, ResultFormat, SuiteRunner, TestSuite};
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use url::Url;

mod cli;
mod client;

/// At least one check did not hold or a query could not be run.
const FAILURE: u8 = 3;
/// The test file could not be loaded.
const LOAD_ERROR: u8 = 1;

pub fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(FAILURE),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(LOAD_ERROR)
        }
    }
}

fn init_logging(args: &Args) {
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false);
    match args.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }
}

fn run(args: &Args) -> Result<bool> {
    let suite = load_suite(&args.test_file)?;
    let endpoint = Url::parse(&args.endpoint)
        .with_context(|| format!("The endpoint URL {} is invalid", args.endpoint))?;
    let executor = HttpExecutor::new(
        endpoint,
        args.send,
        args.post,
        args.timeout.map(Duration::from_secs),
    )?;
    let runner = SuiteRunner::new(executor)
        .with_formats(formats(args.format).iter().copied())
        .with_evaluator(
            CheckEvaluator::new().with_prescan_row_data_types(args.prescan_row_data_types),
        );

    let start = Instant::now();
    let report = runner.run(&suite);
    info!(
        queries = suite.queries.len(),
        failed = report.failed_count(),
        elapsed_secs = start.elapsed().as_secs_f64(),
        "test file done"
    );
    let mut stdout = io::stdout().lock();
    write!(stdout, "{report}")?;
    stdout.flush()?;
    Ok(report.passed())
}

fn load_suite(path: &Path) -> Result<TestSuite> {
    let content = if path == Path::new("-") {
        io::read_to_string(io::stdin()).context("Failed to read the test file from stdin")?
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read the test file {}", path.display()))?
    };
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse the test file {}", path.display()))
}

fn formats(selection: FormatSelection) -> &'static [ResultFormat] {
    match selection {
        FormatSelection::Legacy => &[ResultFormat::Legacy],
        FormatSelection::Standard => &[ResultFormat::Standard],
        FormatSelection::Both => &[ResultFormat::Legacy, ResultFormat::Standard],
    }
}

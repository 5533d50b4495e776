use clap::{Parser, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "sparcheck")]
/// Runs the queries of a YAML test file against a SPARQL endpoint and verifies their results
///
/// The exit status is 0 if every check passed, 3 if a check failed or a query could not be run
/// and 1 if the test file could not be loaded or the endpoint URL is invalid.
pub struct Args {
    /// The YAML test file, `-` to read it from the standard input
    #[arg(value_hint = ValueHint::FilePath)]
    pub test_file: PathBuf,
    /// URL of the engine endpoint
    #[arg(value_hint = ValueHint::Url)]
    pub endpoint: String,
    /// The result encodings to request and check
    #[arg(long, value_enum, default_value_t = FormatSelection::Both)]
    pub format: FormatSelection,
    /// Maximum number of rows the engine should send back
    #[arg(long, default_value_t = 4096)]
    pub send: u64,
    /// Timeout of each query execution, in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
    /// Sends the query in a form-urlencoded POST body instead of the URL query string
    #[arg(long)]
    pub post: bool,
    /// Applies the first row_data_types check of each battery before the other checks
    ///
    /// By default the checks are evaluated in the order of the test file.
    #[arg(long)]
    pub prescan_row_data_types: bool,
    /// Format of the logs written to the standard error
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
    /// Prints debug logs, including the rejected candidate datatypes
    ///
    /// The RUST_LOG environment variable is used otherwise.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum FormatSelection {
    /// The legacy QLever JSON export
    Legacy,
    /// The SPARQL 1.1 query results JSON format
    Standard,
    /// The legacy then the standard encoding
    Both,
}

#[derive(Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

//! Error types for the trellis CLI.
//!
//! [`CliError`] wraps the pipeline's errors together with the I/O, CSV,
//! configuration, and export failures that only exist at the CLI boundary.
//! Every variant carries a [`miette::Diagnostic`] code so the binary can
//! render rich reports.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use trellis::TrellisError;

/// The main error type for CLI operations.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(code(trellis::pipeline))]
    Pipeline(#[from] TrellisError),

    #[error("I/O error: {0}")]
    #[diagnostic(code(trellis::io))]
    Io(#[from] std::io::Error),

    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(trellis::csv))]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: cell ({row}, {column}) is not a number: {value:?}")]
    #[diagnostic(
        code(trellis::csv),
        help("leave cells empty (or NA) to mark missing measurements")
    )]
    InvalidCell {
        path: PathBuf,
        row: String,
        column: String,
        value: String,
    },

    #[error("failed to parse TOML configuration: {0}")]
    #[diagnostic(code(trellis::config))]
    ConfigParse(String),

    #[error("missing configuration file: {0}")]
    #[diagnostic(code(trellis::config))]
    MissingConfigFile(PathBuf),

    #[error("failed to serialize network: {0}")]
    #[diagnostic(code(trellis::export))]
    Export(#[from] serde_json::Error),
}

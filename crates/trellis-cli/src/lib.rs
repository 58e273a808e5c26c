//! CLI logic for the trellis network tool.
//!
//! This module contains the core CLI logic: CSV dataset loading, TOML
//! configuration discovery, pipeline orchestration, and JSON export.

pub mod config;
pub mod export;
pub mod label;
pub mod loader;

mod args;
mod error;

pub use args::Args;
pub use error::CliError;

use log::info;

use trellis::{NetworkBuilder, config::PipelineConfig, identifier::Id};

/// Run the trellis CLI application
///
/// This function loads every CSV matrix under the input directory, runs the
/// extraction/clustering/layout pipeline, and writes the resulting node and
/// edge tables as JSON.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O and CSV parsing errors
/// - Configuration loading errors
/// - Invalid policy overrides
/// - Pipeline errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_dir = args.input,
        output_path = args.output;
        "Building association network"
    );

    // Load configuration
    let cli_config = config::load_config(args.config.as_ref())?;

    // Apply command-line overrides; policy strings must parse before any
    // dataset is touched.
    let mut extract = cli_config.pipeline().extract().clone();
    if let Some(value) = &args.drop {
        extract = extract.with_drop(value.parse()?);
    }
    if let Some(value) = &args.keep {
        extract = extract.with_keep(value.parse()?);
    }
    if let Some(selected) = &args.select {
        extract = extract.with_selected(Id::new(selected));
    }
    let pipeline = PipelineConfig::new(extract, cli_config.pipeline().layout().clone());

    // Load datasets and run the pipeline
    let datasets = loader::load_datasets(&args.input, &cli_config)?;
    let network = NetworkBuilder::new(pipeline).build(&datasets)?;

    if !network.warnings.is_empty() {
        info!(warnings_len = network.warnings.len(); "Pipeline completed with warnings");
    }

    // Write output file
    export::write_json(&args.output, &network)?;

    info!(output_file = args.output; "Network exported successfully");

    Ok(())
}

pub mod segments;
pub mod tops;

use crate::cli::AnalysisArgs;
use crate::config::PartialAnalysisConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use foldtops::core::io::backbone_csv::BackboneCsvFile;
use foldtops::core::io::traits::StructureFile;
use foldtops::core::models::domain::ChainDomainMap;
use foldtops::core::models::topology::ProteinTopology;
use foldtops::engine::progress::ProgressReporter;
use foldtops::workflows;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// Loads the configuration and the input structure, then runs the analysis workflow.
fn analyse(args: &AnalysisArgs) -> Result<(ProteinTopology, ChainDomainMap)> {
    let partial_config = PartialAnalysisConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let (config, domains) = partial_config.merge_with_cli(args)?;

    info!("Loading input structure from {:?}", &args.input);
    let mut protein =
        BackboneCsvFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
            path: args.input.clone(),
            source: e.into(),
        })?;
    if let Some(name) = &args.name {
        protein.name = name.clone();
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core analysis workflow...");
    let topology = workflows::analyze::run(&protein, &config, &reporter)?;

    for failure in &topology.failures {
        warn!("Skipped {}", failure);
        eprintln!("Warning: skipped {}", failure);
    }
    info!(
        "Workflow finished with {} analysed chain(s).",
        topology.chains.len()
    );
    Ok((topology, domains))
}

/// Buffered writer for `path`, or standard output when no path is given.
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

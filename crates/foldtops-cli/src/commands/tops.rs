use super::{analyse, open_output};
use crate::cli::AnalysisArgs;
use crate::error::Result;
use foldtops::core::io::tops::protein_tops_strings;
use std::io::Write;
use tracing::info;

pub fn run(args: AnalysisArgs) -> Result<()> {
    let (topology, domains) = analyse(&args)?;

    let lines = protein_tops_strings(&topology, &domains);
    let mut output = open_output(args.output.as_deref())?;
    for line in &lines {
        writeln!(output, "{line}")?;
    }
    output.flush()?;

    info!("Wrote {} TOPS string(s).", lines.len());
    Ok(())
}

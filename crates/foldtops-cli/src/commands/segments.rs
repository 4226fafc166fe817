use super::{analyse, open_output};
use crate::cli::AnalysisArgs;
use crate::error::Result;
use foldtops::core::models::topology::ProteinTopology;
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// One CSV row per segment.
#[derive(Debug, Serialize, PartialEq)]
struct SegmentRow {
    structure: String,
    chain: String,
    index: usize,
    kind: String,
    first: Option<isize>,
    last: Option<isize>,
    orientation: String,
    symbol: Option<char>,
    torsion_agreement: Option<f64>,
}

fn segment_rows(topology: &ProteinTopology) -> Vec<SegmentRow> {
    topology
        .chains
        .iter()
        .flat_map(|chain| {
            chain.summaries().into_iter().map(move |summary| SegmentRow {
                structure: topology.name.clone(),
                chain: chain.label(),
                index: summary.id.0,
                kind: summary.kind.to_string(),
                first: summary.first_number,
                last: summary.last_number,
                orientation: summary.orientation.to_string(),
                symbol: summary.symbol,
                torsion_agreement: summary.torsion_agreement,
            })
        })
        .collect()
}

fn write_rows(rows: &[SegmentRow], output: impl Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn run(args: AnalysisArgs) -> Result<()> {
    let (topology, _) = analyse(&args)?;

    let rows = segment_rows(&topology);
    write_rows(&rows, open_output(args.output.as_deref())?)?;

    info!("Wrote {} segment row(s).", rows.len());
    Ok(())
}

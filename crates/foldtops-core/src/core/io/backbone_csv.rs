use crate::core::io::traits::StructureFile;
use crate::core::models::builder::{BuildError, ProteinBuilder};
use crate::core::models::chain::ChainType;
use crate::core::models::protein::Protein;
use nalgebra::Point3;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum BackboneCsvError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Record {record}: chain label '{value}' must be a single character")]
    InvalidChainLabel { record: usize, value: String },
    #[error("Record {record}: {source}")]
    Build { record: usize, source: BuildError },
}

#[derive(Debug, Deserialize)]
struct AtomRecord {
    chain: String,
    residue_number: isize,
    residue_name: String,
    atom: String,
    x: f64,
    y: f64,
    z: f64,
}

/// Flat backbone table with the header `chain,residue_number,residue_name,atom,x,y,z`.
///
/// Rows are grouped into residues in file order. Each chain's type is inferred
/// from the residue names it carries.
pub struct BackboneCsvFile;

fn chain_label(value: &str, record: usize) -> Result<char, BackboneCsvError> {
    let trimmed = value.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(' '),
        (Some(c), None) => Ok(c),
        _ => Err(BackboneCsvError::InvalidChainLabel {
            record,
            value: value.to_string(),
        }),
    }
}

impl StructureFile for BackboneCsvFile {
    type Error = BackboneCsvError;

    fn read_from(reader: &mut impl BufRead) -> Result<Protein, Self::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut records = Vec::new();
        for (i, result) in csv_reader.deserialize::<AtomRecord>().enumerate() {
            let record = result?;
            let label = chain_label(&record.chain, i + 1)?;
            records.push((label, record));
        }

        let mut residue_names: HashMap<char, Vec<(isize, &str)>> = HashMap::new();
        for (label, record) in &records {
            let names = residue_names.entry(*label).or_default();
            let key = (record.residue_number, record.residue_name.as_str());
            if names.last() != Some(&key) {
                names.push(key);
            }
        }
        let chain_types: HashMap<char, ChainType> = residue_names
            .iter()
            .map(|(&label, names)| (label, ChainType::infer(names.iter().map(|(_, n)| *n))))
            .collect();

        let mut builder = ProteinBuilder::new("");
        let mut current_chain = None;
        for (i, (label, record)) in records.iter().enumerate() {
            let wrap = |source| BackboneCsvError::Build {
                record: i + 1,
                source,
            };
            if current_chain != Some(*label) {
                let chain_type = chain_types.get(label).copied().unwrap_or(ChainType::Other);
                builder.start_chain(*label, chain_type);
                current_chain = Some(*label);
            }
            builder
                .start_residue(record.residue_number, &record.residue_name)
                .map_err(wrap)?;
            builder
                .add_atom(&record.atom, Point3::new(record.x, record.y, record.z))
                .map_err(wrap)?;
        }

        let protein = builder.build();
        debug!(
            chains = protein.chain_count(),
            residues = protein.residue_count(),
            "Read backbone table"
        );
        Ok(protein)
    }
}

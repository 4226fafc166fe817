use super::chain::{Chain, ChainError, ChainType};
use super::protein::Protein;
use nalgebra::Point3;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("A chain must be started before adding residues")]
    NoCurrentChain,
    #[error("A residue must be started before adding atoms")]
    NoCurrentResidue,
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Incremental construction of a [`Protein`] from a stream of atom records.
///
/// Absolute residue indices follow the sequence numbering, so a jump in sequence
/// numbers leaves a matching gap and is treated as a chain break. Repeated or
/// descending numbers (insertion codes) advance the index by one.
pub struct ProteinBuilder {
    name: String,
    chains: Vec<Chain>,

    // --- Builder-specific state ---
    chain_index_map: HashMap<char, usize>,
    current_chain_idx: Option<usize>,
    current_residue_key: Option<(isize, String)>,
}

impl ProteinBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            chains: Vec::new(),
            chain_index_map: HashMap::new(),
            current_chain_idx: None,
            current_residue_key: None,
        }
    }

    pub fn start_chain(&mut self, id: char, chain_type: ChainType) -> &mut Self {
        let idx = *self.chain_index_map.entry(id).or_insert_with(|| {
            self.chains.push(Chain::new(id, chain_type));
            self.chains.len() - 1
        });
        self.current_chain_idx = Some(idx);
        self.current_residue_key = None;
        self
    }

    /// Starts a residue unless the same (number, name) is already current.
    pub fn start_residue(&mut self, number: isize, name: &str) -> Result<&mut Self, BuildError> {
        let chain_idx = self.current_chain_idx.ok_or(BuildError::NoCurrentChain)?;
        let key = (number, name.trim().to_string());
        if self.current_residue_key.as_ref() == Some(&key) {
            return Ok(self);
        }

        let chain = &mut self.chains[chain_idx];
        let index = match chain.residues().last() {
            None => 0,
            Some(previous) if number > previous.number => {
                previous.index + (number - previous.number) as usize
            }
            Some(previous) => previous.index + 1,
        };
        chain.push_residue_at(index, number, name)?;
        self.current_residue_key = Some(key);
        Ok(self)
    }

    pub fn add_atom(&mut self, name: &str, position: Point3<f64>) -> Result<&mut Self, BuildError> {
        let chain_idx = self.current_chain_idx.ok_or(BuildError::NoCurrentChain)?;
        if self.current_residue_key.is_none() {
            return Err(BuildError::NoCurrentResidue);
        }
        let residue = self.chains[chain_idx]
            .residues_mut()
            .last_mut()
            .ok_or(BuildError::NoCurrentResidue)?;
        residue.set_atom(name, position);
        Ok(self)
    }

    pub fn build(self) -> Protein {
        let mut protein = Protein::new(&self.name);
        for chain in self.chains {
            protein.insert_chain(chain);
        }
        protein
    }
}

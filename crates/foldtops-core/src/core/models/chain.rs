use super::residue::Residue;
use crate::core::utils::geometry::{calculate_amide_hydrogen, torsion};
use crate::core::utils::identifiers::{is_nucleic_acid_residue, is_water_residue};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainType {
    Protein,
    DNA,
    RNA,
    Ligand,
    Water,
    Other,
}

impl ChainType {
    /// Guesses a chain type from the residue names it carries.
    pub fn infer<'a>(residue_names: impl IntoIterator<Item = &'a str>) -> Self {
        let (mut protein, mut nucleic, mut water, mut total) = (0usize, 0usize, 0usize, 0usize);
        for name in residue_names {
            total += 1;
            if name.parse::<super::residue::AminoAcidType>().is_ok() {
                protein += 1;
            } else if is_nucleic_acid_residue(name) {
                nucleic += 1;
            } else if is_water_residue(name) {
                water += 1;
            }
        }
        if total == 0 {
            ChainType::Other
        } else if protein * 2 >= total {
            ChainType::Protein
        } else if nucleic * 2 >= total {
            ChainType::DNA
        } else if water == total {
            ChainType::Water
        } else {
            ChainType::Ligand
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid chain type string")]
pub struct ParseChainTypeError;

impl FromStr for ChainType {
    type Err = ParseChainTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "protein" => Ok(ChainType::Protein),
            "dna" => Ok(ChainType::DNA),
            "rna" => Ok(ChainType::RNA),
            "ligand" => Ok(ChainType::Ligand),
            "water" => Ok(ChainType::Water),
            "other" => Ok(ChainType::Other),
            _ => Err(ParseChainTypeError),
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChainType::Protein => "Protein",
                ChainType::DNA => "DNA",
                ChainType::RNA => "RNA",
                ChainType::Ligand => "Ligand",
                ChainType::Water => "Water",
                ChainType::Other => "Other",
            }
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("Residue index {index} does not follow the previous index {previous} in chain '{chain}'")]
    IndexNotAscending {
        chain: char,
        previous: usize,
        index: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: char,              // Chain identifier (e.g., 'A'), ' ' when unnamed
    pub chain_type: ChainType, // Type of the chain
    residues: Vec<Residue>,    // Residues in ascending absolute index order
}

impl Chain {
    pub fn new(id: char, chain_type: ChainType) -> Self {
        Self {
            id,
            chain_type,
            residues: Vec::new(),
        }
    }

    /// Label used in topology names; a blank identifier becomes "0".
    pub fn label(&self) -> String {
        if self.id.is_whitespace() {
            "0".to_string()
        } else {
            self.id.to_string()
        }
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residues_mut(&mut self) -> &mut [Residue] {
        &mut self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Appends a residue at the next free absolute index.
    pub fn push_residue(&mut self, number: isize, name: &str) -> &mut Residue {
        let index = self.residues.last().map_or(0, |r| r.index + 1);
        self.residues.push(Residue::new(index, number, name));
        let last = self.residues.len() - 1;
        &mut self.residues[last]
    }

    /// Appends a residue at an explicit absolute index, leaving a gap for a chain break.
    pub fn push_residue_at(
        &mut self,
        index: usize,
        number: isize,
        name: &str,
    ) -> Result<&mut Residue, ChainError> {
        if let Some(previous) = self.residues.last() {
            if index <= previous.index {
                return Err(ChainError::IndexNotAscending {
                    chain: self.id,
                    previous: previous.index,
                    index,
                });
            }
        }
        self.residues.push(Residue::new(index, number, name));
        let last = self.residues.len() - 1;
        Ok(&mut self.residues[last])
    }

    /// Position in the residue list of the residue with the given absolute index.
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.residues.binary_search_by_key(&index, |r| r.index).ok()
    }

    pub fn residue_by_index(&self, index: usize) -> Option<&Residue> {
        self.position_of(index).map(|p| &self.residues[p])
    }

    pub fn has_residue_by_index(&self, index: usize) -> bool {
        self.position_of(index).is_some()
    }

    pub fn residue_by_number(&self, number: isize) -> Option<&Residue> {
        self.residues.iter().find(|r| r.number == number)
    }

    /// Position of the first residue whose absolute index is at least `index`.
    pub fn first_position_from(&self, index: usize) -> usize {
        self.residues.partition_point(|r| r.index < index)
    }

    /// True when positions `p` and `p + 1` are adjacent in absolute numbering.
    pub fn is_contiguous_at(&self, position: usize) -> bool {
        match (self.residues.get(position), self.residues.get(position + 1)) {
            (Some(a), Some(b)) => b.index == a.index + 1,
            _ => false,
        }
    }

    /// Synthesizes missing amide hydrogens from the preceding carbonyl.
    ///
    /// Proline, the first residue, residues after a chain break and residues that
    /// already carry an H are left alone. Returns the number of hydrogens placed.
    pub fn add_amide_hydrogens(&mut self, bond_length: f64) -> usize {
        let mut placed = 0;
        for p in 1..self.residues.len() {
            if !self.is_contiguous_at(p - 1) {
                continue;
            }
            let (before, after) = self.residues.split_at_mut(p);
            let previous = &before[p - 1];
            let residue = &mut after[0];
            if residue.is_proline() || residue.has_atom("H") {
                continue;
            }
            let (Some(n), Some(prev_c), Some(prev_o)) = (
                residue.position("N"),
                previous.position("C"),
                previous.position("O"),
            ) else {
                continue;
            };
            if let Some(h) = calculate_amide_hydrogen(&n, &prev_c, &prev_o, bond_length) {
                residue.set_atom("H", h);
                placed += 1;
            }
        }
        placed
    }

    /// Fills phi and psi for every residue whose neighbouring backbone atoms exist.
    pub fn calculate_torsions(&mut self) {
        let count = self.residues.len();
        let mut angles = Vec::with_capacity(count);
        for p in 0..count {
            let residue = &self.residues[p];
            let (n, ca, c) = (
                residue.position("N"),
                residue.position("CA"),
                residue.position("C"),
            );

            let phi = if p > 0 && self.is_contiguous_at(p - 1) {
                match (self.residues[p - 1].position("C"), n, ca, c) {
                    (Some(prev_c), Some(n), Some(ca), Some(c)) => {
                        Some(torsion(&prev_c, &n, &ca, &c))
                    }
                    _ => None,
                }
            } else {
                None
            };

            let psi = if self.is_contiguous_at(p) {
                match (n, ca, c, self.residues[p + 1].position("N")) {
                    (Some(n), Some(ca), Some(c), Some(next_n)) => {
                        Some(torsion(&n, &ca, &c, &next_n))
                    }
                    _ => None,
                }
            } else {
                None
            };
            angles.push((phi, psi));
        }

        for (residue, (phi, psi)) in self.residues.iter_mut().zip(angles) {
            residue.phi = phi;
            residue.psi = psi;
        }
    }
}

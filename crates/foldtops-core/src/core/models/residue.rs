use super::atom::Atom;
use crate::core::utils::geometry::average_points;
use crate::core::utils::identifiers::canonical_atom_name;
use nalgebra::Point3;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcidType {
    // --- Aliphatic, Nonpolar ---
    Alanine,
    Glycine,
    Isoleucine,
    Leucine,
    Proline,
    Valine,

    // --- Aromatic ---
    Phenylalanine,
    Tryptophan,
    Tyrosine,

    // --- Polar, Uncharged ---
    Asparagine,
    Cysteine,
    Glutamine,
    Serine,
    Threonine,
    Methionine,

    // --- Charged ---
    Arginine,
    Lysine,
    AsparticAcid,
    GlutamicAcid,
    Histidine,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Not a standard amino acid residue name: '{0}'")]
pub struct ParseAminoAcidError(pub String);

impl FromStr for AminoAcidType {
    type Err = ParseAminoAcidError;

    /// Parses a three-letter residue name, accepting common protonation-state variants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALA" => Ok(Self::Alanine),
            "GLY" => Ok(Self::Glycine),
            "ILE" => Ok(Self::Isoleucine),
            "LEU" => Ok(Self::Leucine),
            "PRO" => Ok(Self::Proline),
            "VAL" => Ok(Self::Valine),
            "PHE" => Ok(Self::Phenylalanine),
            "TRP" => Ok(Self::Tryptophan),
            "TYR" => Ok(Self::Tyrosine),
            "ASN" => Ok(Self::Asparagine),
            "CYS" | "CYX" => Ok(Self::Cysteine),
            "GLN" => Ok(Self::Glutamine),
            "SER" => Ok(Self::Serine),
            "THR" => Ok(Self::Threonine),
            "MET" => Ok(Self::Methionine),
            "ARG" => Ok(Self::Arginine),
            "LYS" | "LYN" => Ok(Self::Lysine),
            "ASP" | "ASH" => Ok(Self::AsparticAcid),
            "GLU" | "GLH" => Ok(Self::GlutamicAcid),
            "HIS" | "HSD" | "HSE" | "HSP" | "HID" | "HIE" | "HIP" => Ok(Self::Histidine),
            other => Err(ParseAminoAcidError(other.to_string())),
        }
    }
}

/// Pitch of a helical hydrogen-bond pattern, i -> i+r.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HelixRegister {
    ThreeTen,
    Alpha,
    Pi,
}

impl HelixRegister {
    pub const ALL: [HelixRegister; 3] = [Self::ThreeTen, Self::Alpha, Self::Pi];

    pub fn span(self) -> usize {
        match self {
            Self::ThreeTen => 3,
            Self::Alpha => 4,
            Self::Pi => 5,
        }
    }

    pub fn from_separation(separation: isize) -> Option<Self> {
        match separation {
            3 => Some(Self::ThreeTen),
            4 => Some(Self::Alpha),
            5 => Some(Self::Pi),
            _ => None,
        }
    }
}

impl fmt::Display for HelixRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ThreeTen => "3-10",
            Self::Alpha => "alpha",
            Self::Pi => "pi",
        })
    }
}

/// Local structural context inferred from a residue's backbone hydrogen bonds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnvironmentTag {
    Loop,
    HelixStart(HelixRegister),
    HelixMiddle(HelixRegister),
    HelixEnd(HelixRegister),
    IsolatedStrandBond,
    ParallelStrand,
    AntiparallelStrand,
}

impl EnvironmentTag {
    pub fn is_strand_like(self) -> bool {
        matches!(
            self,
            Self::IsolatedStrandBond | Self::ParallelStrand | Self::AntiparallelStrand
        )
    }
}

/// Backbone atoms needed to test a residue as hydrogen-bond donor and acceptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmideGeometry {
    pub n: Point3<f64>,
    pub h: Point3<f64>,
    pub o: Point3<f64>,
    pub c: Point3<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub index: usize,                        // Chain-relative absolute index, may skip at breaks
    pub number: isize,                       // Sequence number from the source structure
    pub name: String,                        // Residue name (e.g., "ALA")
    pub residue_type: Option<AminoAcidType>, // None for non-standard residues
    pub phi: Option<f64>,
    pub psi: Option<f64>,
    pub environment: BTreeSet<EnvironmentTag>,
    atoms: Vec<Atom>,
    atom_name_map: HashMap<String, usize>,
}

impl Residue {
    pub fn new(index: usize, number: isize, name: &str) -> Self {
        Self {
            index,
            number,
            name: name.trim().to_string(),
            residue_type: name.parse().ok(),
            phi: None,
            psi: None,
            environment: BTreeSet::new(),
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    /// Adds or replaces an atom; amide hydrogen aliases are stored as "H".
    pub fn set_atom(&mut self, name: &str, position: Point3<f64>) {
        let name = canonical_atom_name(name);
        match self.atom_name_map.get(name) {
            Some(&slot) => self.atoms[slot].position = position,
            None => {
                self.atom_name_map.insert(name.to_string(), self.atoms.len());
                self.atoms.push(Atom::new(name, position));
            }
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atom_name_map
            .get(canonical_atom_name(name))
            .map(|&slot| &self.atoms[slot])
    }

    pub fn position(&self, name: &str) -> Option<Point3<f64>> {
        self.atom(name).map(|a| a.position)
    }

    pub fn has_atom(&self, name: &str) -> bool {
        self.atom(name).is_some()
    }

    pub fn is_standard_amino_acid(&self) -> bool {
        self.residue_type.is_some()
    }

    pub fn is_proline(&self) -> bool {
        self.residue_type == Some(AminoAcidType::Proline)
    }

    /// N, H, O and C positions, or `None` if any is absent.
    pub fn amide_geometry(&self) -> Option<AmideGeometry> {
        Some(AmideGeometry {
            n: self.position("N")?,
            h: self.position("H")?,
            o: self.position("O")?,
            c: self.position("C")?,
        })
    }

    /// Representative point: the alpha carbon, else the mean of the backbone atoms.
    pub fn center(&self) -> Option<Point3<f64>> {
        if let Some(ca) = self.position("CA") {
            return Some(ca);
        }
        let backbone: Vec<_> = self
            .atoms
            .iter()
            .filter(|a| a.is_backbone())
            .map(|a| a.position)
            .collect();
        average_points(&backbone)
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.number)
    }
}

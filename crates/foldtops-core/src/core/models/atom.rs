use crate::core::utils::identifiers::is_backbone_atom;
use nalgebra::Point3;
use std::str::FromStr;

/// Coarse classification of an atom within its residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AtomRole {
    /// Main-chain atom (N, H, CA, C, O and terminal variants).
    Backbone,
    /// Anything hanging off the alpha carbon.
    Sidechain,
    #[default]
    Other,
}

impl AtomRole {
    pub fn from_atom_name(name: &str) -> Self {
        if is_backbone_atom(name) {
            AtomRole::Backbone
        } else if name.trim().is_empty() {
            AtomRole::Other
        } else {
            AtomRole::Sidechain
        }
    }
}

impl FromStr for AtomRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "backbone" => Ok(AtomRole::Backbone),
            "sidechain" | "side-chain" | "side_chain" => Ok(AtomRole::Sidechain),
            "other" | "unknown" => Ok(AtomRole::Other),
            _ => Err(()),
        }
    }
}

/// A named atom position inside a residue.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Canonical atom name (e.g. "N", "CA", "H").
    pub name: String,
    pub role: AtomRole,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    pub fn new(name: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            role: AtomRole::from_atom_name(name),
            position,
        }
    }

    pub fn is_backbone(&self) -> bool {
        self.role == AtomRole::Backbone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_derives_role_from_name() {
        let ca = Atom::new("CA", Point3::new(1.0, 2.0, 3.0));
        assert_eq!(ca.name, "CA");
        assert_eq!(ca.role, AtomRole::Backbone);
        assert!(ca.is_backbone());

        let cb = Atom::new("CB", Point3::origin());
        assert_eq!(cb.role, AtomRole::Sidechain);
        assert!(!cb.is_backbone());
    }

    #[test]
    fn blank_names_are_classified_as_other() {
        assert_eq!(AtomRole::from_atom_name("  "), AtomRole::Other);
        assert_eq!(AtomRole::default(), AtomRole::Other);
    }

    #[test]
    fn from_str_parses_roles_case_insensitively() {
        assert_eq!(AtomRole::from_str("BACKBONE"), Ok(AtomRole::Backbone));
        assert_eq!(AtomRole::from_str("side-chain"), Ok(AtomRole::Sidechain));
        assert_eq!(AtomRole::from_str("unknown"), Ok(AtomRole::Other));
        assert_eq!(AtomRole::from_str("ligand"), Err(()));
    }
}

use phf::{Map, Set, phf_map, phf_set};

static BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    "N", "H", "HN", "CA", "C", "O", "OXT", "OT1", "OT2",
};

static AMIDE_HYDROGEN_ALIASES: Set<&'static str> = phf_set! {
    "H", "HN", "H1",
};

static NUCLEIC_ACID_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "A", "C", "G", "U", "T", "I", "DA", "DC", "DG", "DT", "DU", "DI",
    "ADE", "CYT", "GUA", "URA", "THY",
};

static WATER_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "H2O", "TIP", "TIP3", "SOL", "DOD",
};

static THREE_TO_ONE_LETTER: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    "HSD" => 'H', "HSE" => 'H', "HSP" => 'H', "HID" => 'H', "HIE" => 'H', "HIP" => 'H',
    "CYX" => 'C', "ASH" => 'D', "GLH" => 'E', "LYN" => 'K',
};

pub fn is_backbone_atom(atom_name: &str) -> bool {
    BACKBONE_ATOM_NAMES.contains(atom_name.trim())
}

/// Maps the amide hydrogen spellings used by different writers onto `"H"`.
pub fn canonical_atom_name(atom_name: &str) -> &str {
    let trimmed = atom_name.trim();
    if AMIDE_HYDROGEN_ALIASES.contains(trimmed) {
        "H"
    } else {
        trimmed
    }
}

pub fn is_nucleic_acid_residue(residue_name: &str) -> bool {
    NUCLEIC_ACID_RESIDUE_NAMES.contains(residue_name.trim())
}

pub fn is_water_residue(residue_name: &str) -> bool {
    WATER_RESIDUE_NAMES.contains(residue_name.trim())
}

pub fn one_letter_code(residue_name: &str) -> Option<char> {
    THREE_TO_ONE_LETTER
        .get(residue_name.trim().to_ascii_uppercase().as_str())
        .copied()
}

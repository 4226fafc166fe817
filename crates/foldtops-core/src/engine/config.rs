use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

/// Geometric thresholds for accepting an N-H···O=C hydrogen bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HBondCriteria {
    /// Upper bound on the H···O distance, in Angstroms.
    pub max_distance: f64,
    /// Lower bound on the N-H···O angle, in degrees.
    pub min_nho_angle: f64,
    /// Lower bound on the H···O=C angle, in degrees.
    pub min_hoc_angle: f64,
}

impl HBondCriteria {
    pub fn new(max_distance: f64, min_nho_angle: f64, min_hoc_angle: f64) -> Self {
        Self {
            max_distance,
            min_nho_angle,
            min_hoc_angle,
        }
    }

    /// Thresholds used for strand pairing: 3.5 Å, 120°, 90°.
    pub fn pairing_default() -> Self {
        Self::new(3.5, 120.0, 90.0)
    }

    /// Stricter thresholds for environment tagging: 3.0 Å, 120°, 90°.
    pub fn tagging_default() -> Self {
        Self::new(3.0, 120.0, 90.0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_distance.is_finite() || self.max_distance <= 0.0 {
            return Err(invalid(
                "max_distance",
                format!("expected a positive distance, got {}", self.max_distance),
            ));
        }
        for (name, value) in [
            ("min_nho_angle", self.min_nho_angle),
            ("min_hoc_angle", self.min_hoc_angle),
        ] {
            if !value.is_finite() || !(0.0..=180.0).contains(&value) {
                return Err(invalid(
                    name,
                    format!("expected an angle between 0 and 180 degrees, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

impl Default for HBondCriteria {
    fn default() -> Self {
        Self::pairing_default()
    }
}

/// Which bond set drives environment tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// One detection pass serves tagging and pairing.
    #[default]
    Standard,
    /// A second, stricter pass feeds tagging and strand continuity only.
    DsspStyle,
}

impl FromStr for AnalysisMode {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "dssp" | "dssp-style" | "dssp_style" => Ok(Self::DsspStyle),
            other => Err(invalid("mode", format!("unknown analysis mode '{other}'"))),
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standard => "standard",
            Self::DsspStyle => "dssp-style",
        })
    }
}

/// How non-strand segments are oriented when a chain does not have exactly one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HelixOrientationFallback {
    #[default]
    Unresolved,
    /// Orient against the least-squares axis through all segment centroids.
    ChainAxis,
}

impl FromStr for HelixOrientationFallback {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unresolved" | "none" => Ok(Self::Unresolved),
            "chain-axis" | "chain_axis" => Ok(Self::ChainAxis),
            other => Err(invalid(
                "helix_orientation_fallback",
                format!("unknown fallback '{other}'"),
            )),
        }
    }
}

impl fmt::Display for HelixOrientationFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unresolved => "unresolved",
            Self::ChainAxis => "chain-axis",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmideHydrogenConfig {
    pub enabled: bool,
    pub bond_length: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetConfig {
    /// Strands whose centroids are at least this far apart never pair, in Angstroms.
    pub max_centroid_distance: f64,
    /// Minimum number of residues of the earlier strand bonded to the later one.
    pub min_bonded_residues: usize,
    /// Chirality is computed only when fewer structured segments separate the pair.
    pub max_chirality_separation: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            max_centroid_distance: 10.0,
            min_bonded_residues: 2,
            max_chirality_separation: 11,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub pairing: HBondCriteria,
    pub tagging: HBondCriteria,
    pub mode: AnalysisMode,
    pub amide_hydrogens: AmideHydrogenConfig,
    pub fill_loops: bool,
    pub sheets: SheetConfig,
    pub helix_orientation_fallback: HelixOrientationFallback,
}

impl AnalysisConfig {
    /// Criteria whose bonds feed environment tagging and strand continuity.
    pub fn tagging_criteria(&self) -> &HBondCriteria {
        match self.mode {
            AnalysisMode::Standard => &self.pairing,
            AnalysisMode::DsspStyle => &self.tagging,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pairing: HBondCriteria::pairing_default(),
            tagging: HBondCriteria::tagging_default(),
            mode: AnalysisMode::default(),
            amide_hydrogens: AmideHydrogenConfig {
                enabled: true,
                bond_length: 1.0,
            },
            fill_loops: true,
            sheets: SheetConfig::default(),
            helix_orientation_fallback: HelixOrientationFallback::default(),
        }
    }
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    pairing: Option<HBondCriteria>,
    tagging: Option<HBondCriteria>,
    mode: Option<AnalysisMode>,
    add_amide_hydrogens: Option<bool>,
    amide_bond_length: Option<f64>,
    fill_loops: Option<bool>,
    max_centroid_distance: Option<f64>,
    min_bonded_residues: Option<usize>,
    max_chirality_separation: Option<usize>,
    helix_orientation_fallback: Option<HelixOrientationFallback>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pairing_criteria(mut self, criteria: HBondCriteria) -> Self {
        self.pairing = Some(criteria);
        self
    }
    pub fn tagging_criteria(mut self, criteria: HBondCriteria) -> Self {
        self.tagging = Some(criteria);
        self
    }
    pub fn mode(mut self, mode: AnalysisMode) -> Self {
        self.mode = Some(mode);
        self
    }
    pub fn add_amide_hydrogens(mut self, enabled: bool) -> Self {
        self.add_amide_hydrogens = Some(enabled);
        self
    }
    pub fn amide_bond_length(mut self, length: f64) -> Self {
        self.amide_bond_length = Some(length);
        self
    }
    pub fn fill_loops(mut self, enabled: bool) -> Self {
        self.fill_loops = Some(enabled);
        self
    }
    pub fn max_centroid_distance(mut self, distance: f64) -> Self {
        self.max_centroid_distance = Some(distance);
        self
    }
    pub fn min_bonded_residues(mut self, count: usize) -> Self {
        self.min_bonded_residues = Some(count);
        self
    }
    pub fn max_chirality_separation(mut self, separation: usize) -> Self {
        self.max_chirality_separation = Some(separation);
        self
    }
    pub fn helix_orientation_fallback(mut self, fallback: HelixOrientationFallback) -> Self {
        self.helix_orientation_fallback = Some(fallback);
        self
    }

    /// Pairing criteria are required; every other setting falls back to its default.
    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let defaults = AnalysisConfig::default();

        let pairing = self
            .pairing
            .ok_or(ConfigError::MissingParameter("pairing_criteria"))?;
        pairing.validate()?;
        let tagging = self.tagging.unwrap_or(defaults.tagging);
        tagging.validate()?;

        let bond_length = self
            .amide_bond_length
            .unwrap_or(defaults.amide_hydrogens.bond_length);
        if !bond_length.is_finite() || bond_length <= 0.0 {
            return Err(invalid(
                "amide_bond_length",
                format!("expected a positive length, got {bond_length}"),
            ));
        }

        let max_centroid_distance = self
            .max_centroid_distance
            .unwrap_or(defaults.sheets.max_centroid_distance);
        if !max_centroid_distance.is_finite() || max_centroid_distance <= 0.0 {
            return Err(invalid(
                "max_centroid_distance",
                format!("expected a positive distance, got {max_centroid_distance}"),
            ));
        }

        Ok(AnalysisConfig {
            pairing,
            tagging,
            mode: self.mode.unwrap_or(defaults.mode),
            amide_hydrogens: AmideHydrogenConfig {
                enabled: self
                    .add_amide_hydrogens
                    .unwrap_or(defaults.amide_hydrogens.enabled),
                bond_length,
            },
            fill_loops: self.fill_loops.unwrap_or(defaults.fill_loops),
            sheets: SheetConfig {
                max_centroid_distance,
                min_bonded_residues: self
                    .min_bonded_residues
                    .unwrap_or(defaults.sheets.min_bonded_residues),
                max_chirality_separation: self
                    .max_chirality_separation
                    .unwrap_or(defaults.sheets.max_chirality_separation),
            },
            helix_orientation_fallback: self
                .helix_orientation_fallback
                .unwrap_or(defaults.helix_orientation_fallback),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_pairing_criteria() {
        assert_eq!(
            AnalysisConfigBuilder::new().build(),
            Err(ConfigError::MissingParameter("pairing_criteria"))
        );
    }

    #[test]
    fn builder_fills_defaults() {
        let config = AnalysisConfigBuilder::new()
            .pairing_criteria(HBondCriteria::pairing_default())
            .build()
            .unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.tagging_criteria(), &HBondCriteria::new(3.5, 120.0, 90.0));
    }

    #[test]
    fn dssp_style_mode_switches_tagging_criteria() {
        let config = AnalysisConfigBuilder::new()
            .pairing_criteria(HBondCriteria::pairing_default())
            .mode(AnalysisMode::DsspStyle)
            .tagging_criteria(HBondCriteria::new(2.8, 130.0, 100.0))
            .build()
            .unwrap();
        assert_eq!(config.tagging_criteria().max_distance, 2.8);
        assert_eq!(config.pairing.max_distance, 3.5);
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        let err = AnalysisConfigBuilder::new()
            .pairing_criteria(HBondCriteria::new(-1.0, 120.0, 90.0))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "max_distance",
                ..
            }
        ));

        assert!(HBondCriteria::new(3.5, 200.0, 90.0).validate().is_err());
        assert!(HBondCriteria::new(f64::NAN, 120.0, 90.0).validate().is_err());
        assert!(
            AnalysisConfigBuilder::new()
                .pairing_criteria(HBondCriteria::default())
                .amide_bond_length(0.0)
                .build()
                .is_err()
        );
    }

    #[test]
    fn modes_and_fallbacks_parse_from_strings() {
        assert_eq!("DSSP".parse::<AnalysisMode>().unwrap(), AnalysisMode::DsspStyle);
        assert_eq!(
            "chain-axis".parse::<HelixOrientationFallback>().unwrap(),
            HelixOrientationFallback::ChainAxis
        );
        assert!("fancy".parse::<AnalysisMode>().is_err());
        assert_eq!(AnalysisMode::DsspStyle.to_string(), "dssp-style");
    }
}

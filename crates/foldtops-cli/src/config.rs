use crate::cli::AnalysisArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use foldtops::core::models::domain::{ChainDomainMap, DomainEntry};
use foldtops::engine::config as core_config;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialHBondCriteria {
    max_distance: Option<f64>,
    min_nho_angle: Option<f64>,
    min_hoc_angle: Option<f64>,
}

impl PartialHBondCriteria {
    fn resolve(self, defaults: core_config::HBondCriteria) -> core_config::HBondCriteria {
        core_config::HBondCriteria::new(
            self.max_distance.unwrap_or(defaults.max_distance),
            self.min_nho_angle.unwrap_or(defaults.min_nho_angle),
            self.min_hoc_angle.unwrap_or(defaults.min_hoc_angle),
        )
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialAmideHydrogenConfig {
    enabled: Option<bool>,
    bond_length: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialSheetConfig {
    max_centroid_distance: Option<f64>,
    min_bonded_residues: Option<usize>,
    max_chirality_separation: Option<usize>,
}

/// Analysis settings as read from a TOML file; every field is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialAnalysisConfig {
    mode: Option<String>,
    fill_loops: Option<bool>,
    helix_orientation_fallback: Option<String>,
    pairing: Option<PartialHBondCriteria>,
    tagging: Option<PartialHBondCriteria>,
    amide_hydrogens: Option<PartialAmideHydrogenConfig>,
    sheets: Option<PartialSheetConfig>,
    #[serde(default, rename = "domain")]
    domains: Vec<DomainEntry>,
}

impl PartialAnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads `path` when given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Layers `--set` values and explicit flags over the file values and the core
    /// defaults, and resolves the domain map.
    pub fn merge_with_cli(
        mut self,
        args: &AnalysisArgs,
    ) -> Result<(core_config::AnalysisConfig, ChainDomainMap)> {
        self.apply_set_values(&args.set_values)?;

        let defaults = core_config::AnalysisConfig::default();
        let amide = self.amide_hydrogens.take().unwrap_or_default();
        let sheets = self.sheets.take().unwrap_or_default();

        let mut builder = core_config::AnalysisConfigBuilder::new()
            .pairing_criteria(self.pairing.unwrap_or_default().resolve(defaults.pairing))
            .tagging_criteria(self.tagging.unwrap_or_default().resolve(defaults.tagging))
            .add_amide_hydrogens(
                !args.no_amide_hydrogens
                    && amide.enabled.unwrap_or(defaults.amide_hydrogens.enabled),
            )
            .amide_bond_length(
                amide
                    .bond_length
                    .unwrap_or(defaults.amide_hydrogens.bond_length),
            )
            .fill_loops(self.fill_loops.unwrap_or(defaults.fill_loops))
            .max_centroid_distance(
                sheets
                    .max_centroid_distance
                    .unwrap_or(defaults.sheets.max_centroid_distance),
            )
            .min_bonded_residues(
                sheets
                    .min_bonded_residues
                    .unwrap_or(defaults.sheets.min_bonded_residues),
            )
            .max_chirality_separation(
                sheets
                    .max_chirality_separation
                    .unwrap_or(defaults.sheets.max_chirality_separation),
            );

        if let Some(mode) = args.mode.as_ref().or(self.mode.as_ref()) {
            builder = builder.mode(mode.parse().map_err(config_error)?);
        }
        if let Some(fallback) = args
            .helix_orientation_fallback
            .as_ref()
            .or(self.helix_orientation_fallback.as_ref())
        {
            builder = builder.helix_orientation_fallback(fallback.parse().map_err(config_error)?);
        }

        let config = builder.build().map_err(config_error)?;
        let domains = Self::merge_domains(self.domains, &args.domains)?;
        Ok((config, domains))
    }

    /// Domains given on the command line replace the file's domains for the same chain.
    fn merge_domains(file_entries: Vec<DomainEntry>, cli_values: &[String]) -> Result<ChainDomainMap> {
        let mut cli_entries: BTreeMap<String, Vec<DomainEntry>> = BTreeMap::new();
        for value in cli_values {
            let spec =
                parser::parse_domain_spec(value).map_err(|e| CliError::Argument(e.to_string()))?;
            let list = cli_entries.entry(spec.chain.clone()).or_default();
            list.push(DomainEntry {
                chain: spec.chain,
                number: list.len() + 1,
                ranges: spec.ranges,
            });
        }

        let kept: Vec<DomainEntry> = file_entries
            .into_iter()
            .filter(|entry| !cli_entries.contains_key(&entry.chain))
            .collect();
        let entries = kept.into_iter().chain(cli_entries.into_values().flatten());
        ChainDomainMap::from_entries(entries).map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let (key, value_str) = (key.trim(), value_str.trim());

            match key {
                "mode" => self.mode = Some(value_str.to_string()),
                "helix-orientation-fallback" => {
                    self.helix_orientation_fallback = Some(value_str.to_string())
                }
                "fill-loops" => self.fill_loops = Some(parse_value(key, value_str)?),
                "pairing.max-distance" => {
                    self.pairing.get_or_insert_with(Default::default).max_distance =
                        Some(parse_value(key, value_str)?)
                }
                "pairing.min-nho-angle" => {
                    self.pairing.get_or_insert_with(Default::default).min_nho_angle =
                        Some(parse_value(key, value_str)?)
                }
                "pairing.min-hoc-angle" => {
                    self.pairing.get_or_insert_with(Default::default).min_hoc_angle =
                        Some(parse_value(key, value_str)?)
                }
                "tagging.max-distance" => {
                    self.tagging.get_or_insert_with(Default::default).max_distance =
                        Some(parse_value(key, value_str)?)
                }
                "tagging.min-nho-angle" => {
                    self.tagging.get_or_insert_with(Default::default).min_nho_angle =
                        Some(parse_value(key, value_str)?)
                }
                "tagging.min-hoc-angle" => {
                    self.tagging.get_or_insert_with(Default::default).min_hoc_angle =
                        Some(parse_value(key, value_str)?)
                }
                "amide-hydrogens.enabled" => {
                    self.amide_hydrogens
                        .get_or_insert_with(Default::default)
                        .enabled = Some(parse_value(key, value_str)?)
                }
                "amide-hydrogens.bond-length" => {
                    self.amide_hydrogens
                        .get_or_insert_with(Default::default)
                        .bond_length = Some(parse_value(key, value_str)?)
                }
                "sheets.max-centroid-distance" => {
                    self.sheets
                        .get_or_insert_with(Default::default)
                        .max_centroid_distance = Some(parse_value(key, value_str)?)
                }
                "sheets.min-bonded-residues" => {
                    self.sheets
                        .get_or_insert_with(Default::default)
                        .min_bonded_residues = Some(parse_value(key, value_str)?)
                }
                "sheets.max-chirality-separation" => {
                    self.sheets
                        .get_or_insert_with(Default::default)
                        .max_chirality_separation = Some(parse_value(key, value_str)?)
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value
        ))
    })
}

fn config_error(e: core_config::ConfigError) -> CliError {
    CliError::Config(e.to_string())
}

use super::segment::BackboneSegment;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Inclusive range of sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "(isize, isize)")]
pub struct DomainRange {
    pub start: isize,
    pub end: isize,
}

impl From<(isize, isize)> for DomainRange {
    fn from((start, end): (isize, isize)) -> Self {
        Self { start, end }
    }
}

impl DomainRange {
    pub fn new(start: isize, end: isize) -> Self {
        Self { start, end }
    }

    pub fn contains_number(&self, number: isize) -> bool {
        (self.start..=self.end).contains(&number)
    }

    pub fn contains_segment(&self, segment: &BackboneSegment) -> bool {
        segment.contained_in_number_range(self.start, self.end)
    }
}

impl fmt::Display for DomainRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A numbered part of a chain. A domain with no ranges covers the whole chain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Domain {
    pub number: usize,
    pub ranges: Vec<DomainRange>,
}

impl Domain {
    pub fn new(number: usize, ranges: Vec<DomainRange>) -> Self {
        Self { number, ranges }
    }

    pub fn whole_chain() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// True when the domain is empty or the segment lies wholly inside one range.
    pub fn contains_segment(&self, segment: &BackboneSegment) -> bool {
        self.is_empty() || self.ranges.iter().any(|r| r.contains_segment(segment))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number)?;
        for range in &self.ranges {
            write!(f, " {range}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Domain {number} of chain '{chain}' has an inverted range {start}-{end}")]
    InvertedRange {
        chain: String,
        number: usize,
        start: isize,
        end: isize,
    },
}

/// One `[[domain]]` table of a domain definition file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DomainEntry {
    pub chain: String,
    pub number: usize,
    #[serde(default)]
    pub ranges: Vec<DomainRange>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DomainFile {
    #[serde(default)]
    domain: Vec<DomainEntry>,
}

/// Domain definitions keyed by chain label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainDomainMap {
    domains: BTreeMap<String, Vec<Domain>>,
}

impl ChainDomainMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = DomainEntry>,
    ) -> Result<Self, DomainError> {
        let mut map = Self::new();
        for entry in entries {
            if let Some(bad) = entry.ranges.iter().find(|r| r.start > r.end) {
                return Err(DomainError::InvertedRange {
                    chain: entry.chain,
                    number: entry.number,
                    start: bad.start,
                    end: bad.end,
                });
            }
            map.insert(&entry.chain, Domain::new(entry.number, entry.ranges));
        }
        Ok(map)
    }

    /// Parses `[[domain]]` tables; `path` is used only in error messages.
    pub fn from_toml_str(content: &str, path: &str) -> Result<Self, DomainError> {
        let file: DomainFile = toml::from_str(content).map_err(|e| DomainError::Toml {
            path: path.to_string(),
            source: e,
        })?;
        Self::from_entries(file.domain)
    }

    pub fn load(path: &Path) -> Result<Self, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| DomainError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path.to_string_lossy())
    }

    /// Adds a domain, replacing one with the same number on the same chain.
    pub fn insert(&mut self, chain_label: &str, domain: Domain) {
        let list = self.domains.entry(chain_label.to_string()).or_default();
        match list.iter_mut().find(|d| d.number == domain.number) {
            Some(existing) => *existing = domain,
            None => list.push(domain),
        }
    }

    /// Domains of a chain, or the whole-chain domain when none are defined.
    pub fn domains_for(&self, chain_label: &str) -> Vec<Domain> {
        match self.domains.get(chain_label) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => vec![Domain::whole_chain()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn len(&self) -> usize {
        self.domains.values().map(Vec::len).sum()
    }
}

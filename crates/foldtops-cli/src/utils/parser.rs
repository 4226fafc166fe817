use foldtops::core::models::domain::DomainRange;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid domain '{0}'. Expected 'CHAIN:RANGES' (e.g., 'A:1-50,60-80').")]
    InvalidDomainFormat(String),

    #[error("Invalid residue range '{range}' in domain '{domain}'. Expected 'START-END' or a single number.")]
    InvalidRange { range: String, domain: String },

    #[error("Range '{range}' in domain '{domain}' ends before it starts.")]
    InvertedRange { range: String, domain: String },

    #[error("Component '{component}' cannot be empty in domain '{name}'.")]
    EmptyComponent {
        component: &'static str,
        name: String,
    },
}

/// A chain label with its residue-number ranges, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSpec {
    pub chain: String,
    pub ranges: Vec<DomainRange>,
}

/// Parses `CHAIN:RANGES`, where ranges are comma-separated `START-END` pairs or single
/// residue numbers. Residue numbers may be negative (`A:-5--1`).
pub fn parse_domain_spec(value: &str) -> Result<DomainSpec, ParseError> {
    let (chain, ranges) = value
        .split_once(':')
        .ok_or_else(|| ParseError::InvalidDomainFormat(value.to_string()))?;

    let chain = chain.trim();
    if chain.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "chain",
            name: value.to_string(),
        });
    }
    if ranges.trim().is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "ranges",
            name: value.to_string(),
        });
    }

    let ranges = ranges
        .split(',')
        .map(|range| parse_range(range.trim(), value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DomainSpec {
        chain: chain.to_string(),
        ranges,
    })
}

fn parse_range(range: &str, domain: &str) -> Result<DomainRange, ParseError> {
    let invalid = || ParseError::InvalidRange {
        range: range.to_string(),
        domain: domain.to_string(),
    };

    // Skip the first character so a leading minus sign is not taken as the separator.
    let separator = range
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '-')
        .map(|(i, _)| i);

    let (start, end) = match separator {
        Some(i) => (&range[..i], &range[i + 1..]),
        None => (range, range),
    };
    let start: isize = start.trim().parse().map_err(|_| invalid())?;
    let end: isize = end.trim().parse().map_err(|_| invalid())?;

    if start > end {
        return Err(ParseError::InvertedRange {
            range: range.to_string(),
            domain: domain.to_string(),
        });
    }
    Ok(DomainRange::new(start, end))
}

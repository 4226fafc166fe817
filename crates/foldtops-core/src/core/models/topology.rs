use super::edge::Edge;
use super::ids::SegmentId;
use super::segment::{BackboneSegment, Orientation, SegmentKind};
use super::sheet::Sheet;
use std::fmt;

/// Frozen analysis result for one chain.
///
/// Segments are held in sequence order with the N terminus first and the C
/// terminus last; a [`SegmentId`] is a position in that list. Sheets and
/// chirality edges refer to segments by id.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainTopology {
    pub chain_id: char,
    segments: Vec<BackboneSegment>,
    sheets: Vec<Sheet>,
    chiralities: Vec<Edge>,
    hbond_count: usize,
}

impl ChainTopology {
    pub fn new(
        chain_id: char,
        segments: Vec<BackboneSegment>,
        sheets: Vec<Sheet>,
        chiralities: Vec<Edge>,
        hbond_count: usize,
    ) -> Self {
        Self {
            chain_id,
            segments,
            sheets,
            chiralities,
            hbond_count,
        }
    }

    /// Chain label used in topology names; a blank identifier becomes "0".
    pub fn label(&self) -> String {
        if self.chain_id.is_whitespace() {
            "0".to_string()
        } else {
            self.chain_id.to_string()
        }
    }

    pub fn segments(&self) -> &[BackboneSegment] {
        &self.segments
    }

    pub fn segment(&self, id: SegmentId) -> Option<&BackboneSegment> {
        self.segments.get(id.0)
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn chiralities(&self) -> &[Edge] {
        &self.chiralities
    }

    /// Number of hydrogen bonds found by the pairing pass.
    pub fn hbond_count(&self) -> usize {
        self.hbond_count
    }

    pub fn count_of(&self, kind: SegmentKind) -> usize {
        self.segments.iter().filter(|s| s.kind == kind).count()
    }

    /// Read-only per-segment view in sequence order.
    pub fn summaries(&self) -> Vec<SegmentSummary> {
        self.segments
            .iter()
            .enumerate()
            .map(|(position, segment)| SegmentSummary::new(SegmentId(position), segment))
            .collect()
    }
}

/// Flat description of one segment for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSummary {
    pub id: SegmentId,
    pub kind: SegmentKind,
    pub first_number: Option<isize>,
    pub last_number: Option<isize>,
    pub orientation: Orientation,
    pub symbol: Option<char>,
    pub torsion_agreement: Option<f64>,
}

impl SegmentSummary {
    fn new(id: SegmentId, segment: &BackboneSegment) -> Self {
        Self {
            id,
            kind: segment.kind,
            first_number: segment.first_number(),
            last_number: segment.last_number(),
            orientation: segment.orientation,
            symbol: segment.symbol(),
            torsion_agreement: segment.torsion_agreement,
        }
    }
}

/// A chain whose analysis was aborted; the other chains are unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainFailure {
    pub chain_id: char,
    pub reason: String,
}

impl fmt::Display for ChainFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain '{}': {}", self.chain_id, self.reason)
    }
}

/// Analysis results for every protein chain of a structure, in chain order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProteinTopology {
    pub name: String,
    pub chains: Vec<ChainTopology>,
    pub failures: Vec<ChainFailure>,
}

impl ProteinTopology {
    pub fn chain(&self, chain_id: char) -> Option<&ChainTopology> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

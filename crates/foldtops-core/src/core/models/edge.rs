use super::axis::PairRelation;
use super::ids::SegmentId;
use crate::core::utils::geometry::Handedness;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeTag {
    Relation(PairRelation),
    Chirality(Handedness),
}

impl EdgeTag {
    pub fn symbol(self) -> char {
        match self {
            EdgeTag::Relation(relation) => relation.symbol(),
            EdgeTag::Chirality(hand) => hand.symbol(),
        }
    }
}

/// A labelled connection between two segments of one chain, stored in sequence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub first: SegmentId,
    pub second: SegmentId,
    pub tags: Vec<EdgeTag>,
}

impl Edge {
    pub fn new(a: SegmentId, b: SegmentId, tag: EdgeTag) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first,
            second,
            tags: vec![tag],
        }
    }

    pub fn same_pair(&self, other: &Edge) -> bool {
        self.first == other.first && self.second == other.second
    }

    /// Appends the other edge's tags.
    pub fn merge_with(&mut self, other: &Edge) {
        self.tags.extend_from_slice(&other.tags);
    }

    pub fn tag_string(&self) -> String {
        self.tags.iter().map(|t| t.symbol()).collect()
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.first.0, self.second.0, self.tag_string())
    }
}

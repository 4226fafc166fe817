use super::axis::Axis;
use super::ids::SegmentId;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// An undirected partnership graph over the strands of one chain.
///
/// Each pair is stored once, under the strand that comes first in sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub number: usize,
    partners: BTreeMap<SegmentId, Vec<SegmentId>>,
    pub axis: Option<Axis>,
}

impl Sheet {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            partners: BTreeMap::new(),
            axis: None,
        }
    }

    pub fn with_pair(number: usize, a: SegmentId, b: SegmentId) -> Self {
        let mut sheet = Self::new(number);
        sheet.add_pair(a, b);
        sheet
    }

    /// Records the pair under the earlier strand. Repeated pairs are ignored.
    pub fn add_pair(&mut self, a: SegmentId, b: SegmentId) {
        let (key, partner) = if a <= b { (a, b) } else { (b, a) };
        let list = self.partners.entry(key).or_default();
        if !list.contains(&partner) {
            list.push(partner);
        }
    }

    pub fn contains(&self, strand: SegmentId) -> bool {
        self.partners.contains_key(&strand)
            || self.partners.values().any(|list| list.contains(&strand))
    }

    /// Every strand in the sheet, in sequence order.
    pub fn members(&self) -> BTreeSet<SegmentId> {
        self.partners
            .iter()
            .flat_map(|(&key, list)| std::iter::once(key).chain(list.iter().copied()))
            .collect()
    }

    pub fn partners_of(&self, key: SegmentId) -> &[SegmentId] {
        self.partners.get(&key).map_or(&[], Vec::as_slice)
    }

    /// All (key, partner) pairs in graph order.
    pub fn pairs(&self) -> impl Iterator<Item = (SegmentId, SegmentId)> + '_ {
        self.partners
            .iter()
            .flat_map(|(&key, list)| list.iter().map(move |&partner| (key, partner)))
    }

    /// Strands adjacent to `strand` in either direction.
    pub fn neighbours(&self, strand: SegmentId) -> Vec<SegmentId> {
        self.pairs()
            .filter_map(|(a, b)| {
                if a == strand {
                    Some(b)
                } else if b == strand {
                    Some(a)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Absorbs every pair of `other`; the receiving sheet keeps its number.
    pub fn extend(&mut self, other: Sheet) {
        for (key, partner) in other.pairs() {
            self.add_pair(key, partner);
        }
    }

    pub fn pair_count(&self) -> usize {
        self.partners.values().map(Vec::len).sum()
    }

    pub fn strand_count(&self) -> usize {
        self.members().len()
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sheet {} [", self.number)?;
        for (i, (key, partner)) in self.pairs().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key} -> {partner}")?;
        }
        f.write_str("]")
    }
}

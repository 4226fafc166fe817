use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    pub struct ChainId;
}

/// Stable position of a segment within its chain's sequence-ordered segment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub usize);

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

use super::axis::Axis;
use super::chain::Chain;
use nalgebra::Point3;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TerminusEnd {
    N,
    C,
}

/// Closed set of backbone element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Helix,
    Strand,
    UnstructuredLoop,
    Terminus(TerminusEnd),
}

/// Per-kind behaviour, looked up by [`SegmentKind::traits`].
pub struct KindTraits {
    pub name: &'static str,
    /// Topology symbol in its "up" (uppercase) form; `None` for unrendered kinds.
    pub symbol: Option<char>,
    /// Whether the kind takes part in topology numbering and path distances.
    pub structured: bool,
    /// Whether a residue's phi/psi pair is typical for the kind.
    pub torsion_match: fn(f64, f64) -> bool,
}

fn helix_torsions(phi: f64, psi: f64) -> bool {
    (-100.0..=-30.0).contains(&phi) && (-80.0..=-10.0).contains(&psi)
}

fn strand_torsions(phi: f64, psi: f64) -> bool {
    (-180.0..=-45.0).contains(&phi)
        && ((90.0..=180.0).contains(&psi) || (-180.0..=-150.0).contains(&psi))
}

fn loop_torsions(phi: f64, psi: f64) -> bool {
    !helix_torsions(phi, psi) && !strand_torsions(phi, psi)
}

fn no_torsions(_: f64, _: f64) -> bool {
    false
}

static HELIX: KindTraits = KindTraits {
    name: "Helix",
    symbol: Some('H'),
    structured: true,
    torsion_match: helix_torsions,
};
static STRAND: KindTraits = KindTraits {
    name: "Strand",
    symbol: Some('E'),
    structured: true,
    torsion_match: strand_torsions,
};
static LOOP: KindTraits = KindTraits {
    name: "Loop",
    symbol: None,
    structured: false,
    torsion_match: loop_torsions,
};
static N_TERMINUS: KindTraits = KindTraits {
    name: "N-terminus",
    symbol: Some('N'),
    structured: true,
    torsion_match: no_torsions,
};
static C_TERMINUS: KindTraits = KindTraits {
    name: "C-terminus",
    symbol: Some('C'),
    structured: true,
    torsion_match: no_torsions,
};

impl SegmentKind {
    pub fn traits(self) -> &'static KindTraits {
        match self {
            SegmentKind::Helix => &HELIX,
            SegmentKind::Strand => &STRAND,
            SegmentKind::UnstructuredLoop => &LOOP,
            SegmentKind::Terminus(TerminusEnd::N) => &N_TERMINUS,
            SegmentKind::Terminus(TerminusEnd::C) => &C_TERMINUS,
        }
    }

    pub fn is_structured(self) -> bool {
        self.traits().structured
    }

    pub fn is_terminus(self) -> bool {
        matches!(self, SegmentKind::Terminus(_))
    }

    pub fn matches_torsions(self, phi: f64, psi: f64) -> bool {
        (self.traits().torsion_match)(phi, psi)
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.traits().name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Unknown,
    Up,
    Down,
}

impl Orientation {
    pub fn opposite(self) -> Self {
        match self {
            Orientation::Up => Orientation::Down,
            Orientation::Down => Orientation::Up,
            Orientation::Unknown => Orientation::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        self != Orientation::Unknown
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::Unknown => "unknown",
            Orientation::Up => "up",
            Orientation::Down => "down",
        })
    }
}

/// Inclusive range of residue-list positions plus the matching sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResidueSpan {
    pub first: usize,
    pub last: usize,
    pub first_number: isize,
    pub last_number: isize,
}

impl ResidueSpan {
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn contains(&self, position: usize) -> bool {
        (self.first..=self.last).contains(&position)
    }

    pub fn overlaps(&self, other: &ResidueSpan) -> bool {
        self.first <= other.last && other.first <= self.last
    }
}

/// A secondary-structure element of one chain.
#[derive(Debug, Clone, PartialEq)]
pub struct BackboneSegment {
    pub kind: SegmentKind,
    /// Residues covered; `None` only for termini.
    pub span: Option<ResidueSpan>,
    pub axis: Axis,
    pub orientation: Orientation,
    /// Fraction of residues whose phi/psi match the kind, when any torsions exist.
    pub torsion_agreement: Option<f64>,
}

impl BackboneSegment {
    /// Builds a segment over positions `first..=last` of `chain`.
    ///
    /// The axis runs between the centres of the first and last residues; a
    /// single-residue segment gets a degenerate axis at that residue.
    pub fn from_chain(kind: SegmentKind, chain: &Chain, first: usize, last: usize) -> Option<Self> {
        let residues = chain.residues().get(first..=last)?;
        let (head, tail) = (residues.first()?, residues.last()?);

        let centres: Vec<Point3<f64>> = residues.iter().filter_map(|r| r.center()).collect();
        let axis = match (head.center(), tail.center()) {
            (Some(start), Some(end)) if last > first => Axis::from_endpoints(start, end),
            _ => Axis::fit(&centres).unwrap_or_else(|| Axis::degenerate(Point3::origin())),
        };

        let torsions: Vec<(f64, f64)> = residues
            .iter()
            .filter_map(|r| Some((r.phi?, r.psi?)))
            .collect();
        let torsion_agreement = if torsions.is_empty() {
            None
        } else {
            let matching = torsions
                .iter()
                .filter(|&&(phi, psi)| kind.matches_torsions(phi, psi))
                .count();
            Some(matching as f64 / torsions.len() as f64)
        };

        Some(Self {
            kind,
            span: Some(ResidueSpan {
                first,
                last,
                first_number: head.number,
                last_number: tail.number,
            }),
            axis,
            orientation: Orientation::Unknown,
            torsion_agreement,
        })
    }

    /// A residue-free chain-end sentinel. Termini always point up.
    pub fn terminus(end: TerminusEnd, at: Point3<f64>) -> Self {
        Self {
            kind: SegmentKind::Terminus(end),
            span: None,
            axis: Axis::degenerate(at),
            orientation: Orientation::Up,
            torsion_agreement: None,
        }
    }

    pub fn len(&self) -> usize {
        self.span.map_or(0, |s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_none()
    }

    pub fn first_number(&self) -> Option<isize> {
        self.span.map(|s| s.first_number)
    }

    pub fn last_number(&self) -> Option<isize> {
        self.span.map(|s| s.last_number)
    }

    /// Sequence ordering key: N terminus, then residue order, then C terminus.
    pub fn sort_key(&self) -> (u8, usize) {
        match (self.kind, self.span) {
            (SegmentKind::Terminus(TerminusEnd::N), _) => (0, 0),
            (SegmentKind::Terminus(TerminusEnd::C), _) => (2, 0),
            (_, Some(span)) => (1, span.first),
            (_, None) => (1, 0),
        }
    }

    pub fn overlaps(&self, other: &BackboneSegment) -> bool {
        match (self.span, other.span) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        }
    }

    /// Same kind and axes within the linear tolerance.
    pub fn continuous_with(&self, other: &BackboneSegment) -> bool {
        self.kind == other.kind && self.axis.approximately_linear_to(&other.axis)
    }

    /// True when both sequence-number ends lie in `start..=end`.
    pub fn contained_in_number_range(&self, start: isize, end: isize) -> bool {
        match self.span {
            Some(span) => span.first_number >= start && span.last_number <= end,
            None => false,
        }
    }

    /// Topology character: uppercase when pointing up, lowercase otherwise.
    pub fn symbol(&self) -> Option<char> {
        let symbol = self.kind.traits().symbol?;
        Some(match (self.kind, self.orientation) {
            (SegmentKind::Terminus(_), _) | (_, Orientation::Up) => symbol,
            _ => symbol.to_ascii_lowercase(),
        })
    }
}

impl fmt::Display for BackboneSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(
                f,
                "{} {}-{} ({})",
                self.kind, span.first_number, span.last_number, self.orientation
            ),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::chain::ChainType;

    fn straight_chain(n: usize) -> Chain {
        let mut chain = Chain::new('A', ChainType::Protein);
        for i in 0..n {
            let residue = chain.push_residue(i as isize + 1, "ALA");
            residue.set_atom("CA", Point3::new(0.0, 0.0, i as f64 * 3.3));
        }
        chain
    }

    #[test]
    fn kind_dispatch_table_provides_symbols_and_structure_flags() {
        assert_eq!(SegmentKind::Helix.traits().symbol, Some('H'));
        assert_eq!(SegmentKind::Strand.traits().symbol, Some('E'));
        assert_eq!(SegmentKind::UnstructuredLoop.traits().symbol, None);
        assert!(!SegmentKind::UnstructuredLoop.is_structured());
        assert!(SegmentKind::Terminus(TerminusEnd::C).is_terminus());
        assert_eq!(SegmentKind::Helix.to_string(), "Helix");
    }

    #[test]
    fn torsion_predicates_separate_helix_and_strand_regions() {
        assert!(SegmentKind::Helix.matches_torsions(-57.0, -47.0));
        assert!(!SegmentKind::Helix.matches_torsions(-120.0, 130.0));
        assert!(SegmentKind::Strand.matches_torsions(-120.0, 130.0));
        assert!(SegmentKind::Strand.matches_torsions(-140.0, -170.0));
        assert!(SegmentKind::UnstructuredLoop.matches_torsions(60.0, 40.0));
        assert!(!SegmentKind::Terminus(TerminusEnd::N).matches_torsions(-57.0, -47.0));
    }

    #[test]
    fn from_chain_builds_axis_between_end_residues() {
        let chain = straight_chain(5);
        let segment = BackboneSegment::from_chain(SegmentKind::Strand, &chain, 1, 3).unwrap();
        let span = segment.span.unwrap();
        assert_eq!((span.first_number, span.last_number), (2, 4));
        assert_eq!(segment.len(), 3);
        assert!((segment.axis.direction - nalgebra::Vector3::z()).norm() < 1e-12);
        assert!((segment.axis.centroid.z - 6.6).abs() < 1e-12);
        assert_eq!(segment.orientation, Orientation::Unknown);
        assert!(segment.torsion_agreement.is_none());
    }

    #[test]
    fn single_residue_segment_has_degenerate_axis() {
        let chain = straight_chain(3);
        let segment = BackboneSegment::from_chain(SegmentKind::Helix, &chain, 2, 2).unwrap();
        assert!(segment.axis.is_degenerate());
        assert_eq!(segment.axis.centroid, Point3::new(0.0, 0.0, 6.6));
        assert!(BackboneSegment::from_chain(SegmentKind::Helix, &chain, 2, 5).is_none());
    }

    #[test]
    fn torsion_agreement_counts_matching_residues() {
        let mut chain = straight_chain(4);
        for (residue, (phi, psi)) in chain
            .residues_mut()
            .iter_mut()
            .zip([(-60.0, -45.0), (-65.0, -40.0), (-120.0, 130.0), (-57.0, -47.0)])
        {
            residue.phi = Some(phi);
            residue.psi = Some(psi);
        }
        let helix = BackboneSegment::from_chain(SegmentKind::Helix, &chain, 0, 3).unwrap();
        assert_eq!(helix.torsion_agreement, Some(0.75));
    }

    #[test]
    fn symbols_follow_orientation_and_termini_stay_uppercase() {
        let chain = straight_chain(4);
        let mut strand = BackboneSegment::from_chain(SegmentKind::Strand, &chain, 0, 3).unwrap();
        assert_eq!(strand.symbol(), Some('e'));
        strand.orientation = Orientation::Up;
        assert_eq!(strand.symbol(), Some('E'));
        strand.orientation = Orientation::Down;
        assert_eq!(strand.symbol(), Some('e'));

        let mut c = BackboneSegment::terminus(TerminusEnd::C, Point3::origin());
        assert_eq!(c.symbol(), Some('C'));
        c.orientation = Orientation::Down;
        assert_eq!(c.symbol(), Some('C'));
    }

    #[test]
    fn sort_key_places_termini_at_the_ends() {
        let chain = straight_chain(4);
        let mid = BackboneSegment::from_chain(SegmentKind::Helix, &chain, 2, 3).unwrap();
        let n = BackboneSegment::terminus(TerminusEnd::N, Point3::origin());
        let c = BackboneSegment::terminus(TerminusEnd::C, Point3::origin());
        assert!(n.sort_key() < mid.sort_key());
        assert!(mid.sort_key() < c.sort_key());
    }

    #[test]
    fn continuity_and_overlap_checks() {
        let chain = straight_chain(8);
        let a = BackboneSegment::from_chain(SegmentKind::Helix, &chain, 0, 3).unwrap();
        let b = BackboneSegment::from_chain(SegmentKind::Helix, &chain, 3, 6).unwrap();
        let c = BackboneSegment::from_chain(SegmentKind::Strand, &chain, 5, 7).unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.continuous_with(&b));
        assert!(!b.continuous_with(&c));
        assert!(a.contained_in_number_range(1, 4));
        assert!(!a.contained_in_number_range(2, 10));
    }

    #[test]
    fn orientation_opposites() {
        assert_eq!(Orientation::Up.opposite(), Orientation::Down);
        assert_eq!(Orientation::Unknown.opposite(), Orientation::Unknown);
        assert!(!Orientation::Unknown.is_known());
    }
}

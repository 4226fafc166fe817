use crate::core::models::hbond::HBondNetwork;
use crate::core::models::ids::SegmentId;
use crate::core::models::segment::{BackboneSegment, SegmentKind};
use crate::core::models::sheet::Sheet;
use crate::core::utils::geometry::distance;
use crate::engine::config::SheetConfig;
use itertools::Itertools;
use tracing::{debug, instrument, trace};

/// Number of residues of `strand` bonded to at least one residue of `other`.
pub fn bonded_residue_count(
    strand: &BackboneSegment,
    other: &BackboneSegment,
    network: &HBondNetwork,
) -> usize {
    let (Some(a), Some(b)) = (strand.span, other.span) else {
        return 0;
    };
    (a.first..=a.last)
        .filter(|&position| network.partners(position).iter().any(|&p| b.contains(p)))
        .count()
}

/// Whether two strands are close and bonded enough to share a sheet.
pub fn strands_pair(
    a: &BackboneSegment,
    b: &BackboneSegment,
    network: &HBondNetwork,
    config: &SheetConfig,
) -> bool {
    let separation = distance(&a.axis.centroid, &b.axis.centroid);
    if separation >= config.max_centroid_distance {
        return false;
    }
    bonded_residue_count(a, b, network) >= config.min_bonded_residues
}

/// Adds one accepted strand pair to the sheet list, merging sheets when needed.
fn add_strand_pair(sheets: &mut Vec<Sheet>, a: SegmentId, b: SegmentId) {
    let first = sheets.iter().position(|s| s.contains(a));
    let second = sheets.iter().position(|s| s.contains(b));

    match (first, second) {
        (None, None) => {
            let number = sheets.last().map_or(1, |s| s.number + 1);
            sheets.push(Sheet::with_pair(number, a, b));
        }
        (Some(i), None) | (None, Some(i)) => sheets[i].add_pair(a, b),
        (Some(i), Some(j)) if i == j => sheets[i].add_pair(a, b),
        (Some(i), Some(j)) => {
            let (keep, absorb) = (i.min(j), i.max(j));
            let absorbed = sheets.remove(absorb);
            trace!(
                into = sheets[keep].number,
                from = absorbed.number,
                "Merging sheets"
            );
            sheets[keep].extend(absorbed);
            sheets[keep].add_pair(a, b);
        }
    }
}

/// Groups the strands of a chain into sheets.
///
/// Every strand is compared with every later strand; pairs that pass the centroid
/// distance test and the bonded-residue test are joined in a partnership graph.
#[instrument(skip_all, name = "sheet_construction")]
pub fn run(
    segments: &[BackboneSegment],
    network: &HBondNetwork,
    config: &SheetConfig,
) -> Vec<Sheet> {
    let strands: Vec<usize> = segments
        .iter()
        .enumerate()
        .filter(|(_, s)| s.kind == SegmentKind::Strand)
        .map(|(i, _)| i)
        .collect();

    let mut sheets = Vec::new();
    for (&a, &b) in strands.iter().tuple_combinations() {
        if strands_pair(&segments[a], &segments[b], network, config) {
            trace!(first = a, second = b, "Strands paired");
            add_strand_pair(&mut sheets, SegmentId(a), SegmentId(b));
        }
    }

    debug!(
        strands = strands.len(),
        sheets = sheets.len(),
        "Sheet construction finished."
    );
    sheets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::chain::{Chain, ChainType};
    use crate::core::models::hbond::HydrogenBond;
    use nalgebra::Point3;

    fn bond(donor: usize, acceptor: usize) -> HydrogenBond {
        HydrogenBond {
            donor,
            acceptor,
            distance: 2.0,
            nho_angle: 160.0,
            hoc_angle: 150.0,
            separation: donor as isize - acceptor as isize,
        }
    }

    /// Residue positions map to x; `offsets` moves a position range off-axis in y.
    fn chain(count: usize, offsets: &[(usize, usize, f64)]) -> Chain {
        let mut chain = Chain::new('A', ChainType::Protein);
        for i in 0..count {
            let y = offsets
                .iter()
                .find(|&&(from, to, _)| (from..=to).contains(&i))
                .map_or(0.0, |&(_, _, y)| y);
            let x = if i < count / 2 { i as f64 } else { (count - i) as f64 };
            chain
                .push_residue(i as isize + 1, "ALA")
                .set_atom("CA", Point3::new(x, y, 0.0));
        }
        chain
    }

    fn strand(chain: &Chain, first: usize, last: usize) -> BackboneSegment {
        BackboneSegment::from_chain(SegmentKind::Strand, chain, first, last).unwrap()
    }

    #[test]
    fn pairing_requires_two_bonded_residues() {
        let chain = chain(20, &[(12, 16, 5.0)]);
        let (a, b) = (strand(&chain, 2, 6), strand(&chain, 12, 16));
        let config = SheetConfig::default();

        let mut network = HBondNetwork::new(20);
        network.add(bond(3, 15));
        assert_eq!(bonded_residue_count(&a, &b, &network), 1);
        assert!(!strands_pair(&a, &b, &network, &config));

        network.add(bond(13, 5));
        assert_eq!(bonded_residue_count(&a, &b, &network), 2);
        assert!(strands_pair(&a, &b, &network, &config));
    }

    #[test]
    fn distant_strands_never_pair() {
        let chain = chain(20, &[(12, 16, 12.0)]);
        let (a, b) = (strand(&chain, 2, 6), strand(&chain, 12, 16));
        let mut network = HBondNetwork::new(20);
        for (x, y) in [(2, 16), (4, 14), (6, 12)] {
            network.add(bond(x, y));
            network.add(bond(y, x));
        }
        assert!(!strands_pair(&a, &b, &network, &SheetConfig::default()));
    }

    #[test]
    fn add_strand_pair_creates_extends_and_merges() {
        let mut sheets = Vec::new();
        add_strand_pair(&mut sheets, SegmentId(1), SegmentId(3));
        add_strand_pair(&mut sheets, SegmentId(7), SegmentId(9));
        assert_eq!(
            sheets.iter().map(|s| s.number).collect::<Vec<_>>(),
            vec![1, 2]
        );

        add_strand_pair(&mut sheets, SegmentId(3), SegmentId(5));
        assert_eq!(sheets[0].strand_count(), 3);

        add_strand_pair(&mut sheets, SegmentId(5), SegmentId(7));
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].number, 1);
        assert_eq!(sheets[0].strand_count(), 5);
        assert_eq!(sheets[0].pair_count(), 4);

        // Closing a barrel adds an edge without a new sheet.
        add_strand_pair(&mut sheets, SegmentId(1), SegmentId(9));
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].pair_count(), 5);

        add_strand_pair(&mut sheets, SegmentId(11), SegmentId(13));
        assert_eq!(sheets[1].number, 2);
    }

    #[test]
    fn run_builds_sheet_from_hairpin() {
        let chain = chain(20, &[(12, 16, 4.8)]);
        let segments = vec![strand(&chain, 2, 6), strand(&chain, 12, 16)];
        let mut network = HBondNetwork::new(20);
        for (x, y) in [(2, 16), (4, 14), (6, 12)] {
            network.add(bond(x, y));
            network.add(bond(y, x));
        }
        let sheets = run(&segments, &network, &SheetConfig::default());
        assert_eq!(sheets.len(), 1);
        assert_eq!(
            sheets[0].pairs().collect::<Vec<_>>(),
            vec![(SegmentId(0), SegmentId(1))]
        );
    }
}

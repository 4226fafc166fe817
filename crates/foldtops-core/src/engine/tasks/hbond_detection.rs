use crate::core::models::chain::Chain;
use crate::core::models::hbond::{HBondNetwork, HydrogenBond};
use crate::core::models::residue::AmideGeometry;
use crate::core::utils::geometry::{angle, distance};
use crate::engine::config::{ConfigError, HBondCriteria};
use tracing::{debug, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Minimum absolute index offset between the two residues of a bond.
const MIN_SEQUENCE_GAP: usize = 3;

/// Finds every backbone hydrogen bond of a chain that satisfies `criteria`.
///
/// Each residue is paired with every later residue at least three absolute indices
/// away, and both bond directions are tested. Residues that are not standard amino
/// acids or lack any of N, H, O and C never take part.
#[instrument(skip_all, name = "hbond_detection", fields(chain = %chain.id))]
pub fn run(chain: &Chain, criteria: &HBondCriteria) -> Result<HBondNetwork, ConfigError> {
    criteria.validate()?;

    let residues = chain.residues();
    let geometry: Vec<Option<AmideGeometry>> = residues
        .iter()
        .map(|r| {
            if !r.is_standard_amino_acid() {
                trace!(residue = %r, "Skipping non-standard residue");
                return None;
            }
            let amide = r.amide_geometry();
            if amide.is_none() {
                trace!(residue = %r, "Skipping residue with incomplete amide geometry");
            }
            amide
        })
        .collect();

    #[cfg(not(feature = "parallel"))]
    let iterator = 0..residues.len();

    #[cfg(feature = "parallel")]
    let iterator = (0..residues.len()).into_par_iter();

    let per_residue: Vec<Vec<HydrogenBond>> = iterator
        .map(|i| bonds_from(chain, &geometry, i, criteria))
        .collect();

    let mut network = HBondNetwork::new(residues.len());
    for bond in per_residue.into_iter().flatten() {
        network.add(bond);
    }

    debug!(bonds = network.len(), "Hydrogen-bond detection finished.");
    Ok(network)
}

fn bonds_from(
    chain: &Chain,
    geometry: &[Option<AmideGeometry>],
    i: usize,
    criteria: &HBondCriteria,
) -> Vec<HydrogenBond> {
    let mut found = Vec::new();
    let Some(first) = geometry[i] else {
        return found;
    };
    let residues = chain.residues();
    let start = chain.first_position_from(residues[i].index + MIN_SEQUENCE_GAP);

    for (j, second) in geometry.iter().enumerate().skip(start) {
        let Some(second) = second else {
            continue;
        };
        let separation = residues[i].index as isize - residues[j].index as isize;
        if let Some(bond) = test_bond(i, &first, j, second, separation, criteria) {
            trace!(donor = i, acceptor = j, distance = bond.distance, "Hydrogen bond");
            found.push(bond);
        }
        if let Some(bond) = test_bond(j, second, i, &first, -separation, criteria) {
            trace!(donor = j, acceptor = i, distance = bond.distance, "Hydrogen bond");
            found.push(bond);
        }
    }
    found
}

/// Tests the amide of `donor` against the carbonyl of `acceptor`.
fn test_bond(
    donor: usize,
    donor_geometry: &AmideGeometry,
    acceptor: usize,
    acceptor_geometry: &AmideGeometry,
    separation: isize,
    criteria: &HBondCriteria,
) -> Option<HydrogenBond> {
    let (n, h) = (&donor_geometry.n, &donor_geometry.h);
    let (o, c) = (&acceptor_geometry.o, &acceptor_geometry.c);

    let ho = distance(h, o);
    if ho >= criteria.max_distance {
        return None;
    }
    let nho = angle(n, h, o);
    if nho <= criteria.min_nho_angle {
        return None;
    }
    let hoc = angle(h, o, c);
    if hoc <= criteria.min_hoc_angle {
        return None;
    }

    Some(HydrogenBond {
        donor,
        acceptor,
        distance: ho,
        nho_angle: nho,
        hoc_angle: hoc,
        separation,
    })
}

use crate::core::models::chain::Chain;
use crate::core::models::hbond::HBondNetwork;
use crate::core::models::residue::{EnvironmentTag, HelixRegister};
use std::collections::BTreeSet;
use tracing::{debug, instrument, trace};

/// Tag for a residue with N-terminal separation `n` and C-terminal separation `c`.
///
/// Zero stands for "no bond on that side". Pairs outside the rule table have no tag.
pub fn classify(n: isize, c: isize) -> Option<EnvironmentTag> {
    match (n, c) {
        (0, 0) => Some(EnvironmentTag::Loop),
        (n, 0) => HelixRegister::from_separation(n)
            .map(EnvironmentTag::HelixEnd)
            .or_else(|| (n.abs() > 5).then_some(EnvironmentTag::IsolatedStrandBond)),
        (0, c) => HelixRegister::from_separation(c)
            .map(EnvironmentTag::HelixStart)
            .or_else(|| (c.abs() > 5).then_some(EnvironmentTag::IsolatedStrandBond)),
        (4, 4) => Some(EnvironmentTag::HelixMiddle(HelixRegister::Alpha)),
        (n, c) if n.abs() > 5 && n.abs() == c.abs() => Some(EnvironmentTag::AntiparallelStrand),
        (n, c) if n.abs() > 5 && (n.abs() - c.abs()).abs() == 2 => {
            Some(EnvironmentTag::ParallelStrand)
        }
        _ => None,
    }
}

/// Tag set of the residue at `position` from its donated and accepted bonds.
pub fn environment_of(network: &HBondNetwork, position: usize) -> BTreeSet<EnvironmentTag> {
    let donated: Vec<isize> = network.n_terminal(position).map(|b| b.separation).collect();
    let accepted: Vec<isize> = network.c_terminal(position).map(|b| b.separation).collect();

    if donated.is_empty() && accepted.is_empty() {
        return BTreeSet::from([EnvironmentTag::Loop]);
    }

    let mut tags = BTreeSet::new();
    tags.extend(donated.iter().filter_map(|&n| classify(n, 0)));
    tags.extend(accepted.iter().filter_map(|&c| classify(0, c)));
    for &n in &donated {
        tags.extend(accepted.iter().filter_map(|&c| classify(n, c)));
    }
    tags
}

/// Stores the environment tags of every residue of the chain.
#[instrument(skip_all, name = "environment_classification", fields(chain = %chain.id))]
pub fn run(chain: &mut Chain, network: &HBondNetwork) {
    let mut tagged = 0usize;
    for (position, residue) in chain.residues_mut().iter_mut().enumerate() {
        residue.environment = environment_of(network, position);
        if !residue.environment.contains(&EnvironmentTag::Loop) {
            tagged += 1;
        }
        trace!(residue = %residue, tags = ?residue.environment, "Classified residue");
    }
    debug!(bonded_residues = tagged, "Environment classification finished.");
}

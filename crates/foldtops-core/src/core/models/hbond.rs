/// A backbone N-H···O=C hydrogen bond between two residues of one chain.
///
/// Residues are addressed by their position in the chain's residue list. The
/// separation is `donor index - acceptor index` in absolute numbering, so the
/// carbonyl of residue i bonded by the amide of i+4 has separation +4.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydrogenBond {
    pub donor: usize,
    pub acceptor: usize,
    /// H···O distance in Angstroms.
    pub distance: f64,
    /// N-H···O angle in degrees.
    pub nho_angle: f64,
    /// H···O=C angle in degrees.
    pub hoc_angle: f64,
    pub separation: isize,
}

impl HydrogenBond {
    pub fn has_helix_separation(&self) -> bool {
        matches!(self.separation.abs(), 3..=5)
    }

    pub fn involves(&self, position: usize) -> bool {
        self.donor == position || self.acceptor == position
    }

    /// The other end of the bond, if `position` is one of its ends.
    pub fn partner_of(&self, position: usize) -> Option<usize> {
        if self.donor == position {
            Some(self.acceptor)
        } else if self.acceptor == position {
            Some(self.donor)
        } else {
            None
        }
    }
}

/// Arena of a chain's hydrogen bonds with per-residue donor and acceptor lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HBondNetwork {
    bonds: Vec<HydrogenBond>,
    donated: Vec<Vec<usize>>,
    accepted: Vec<Vec<usize>>,
}

impl HBondNetwork {
    pub fn new(residue_count: usize) -> Self {
        Self {
            bonds: Vec::new(),
            donated: vec![Vec::new(); residue_count],
            accepted: vec![Vec::new(); residue_count],
        }
    }

    pub fn add(&mut self, bond: HydrogenBond) {
        let needed = bond.donor.max(bond.acceptor) + 1;
        if needed > self.donated.len() {
            self.donated.resize(needed, Vec::new());
            self.accepted.resize(needed, Vec::new());
        }
        let slot = self.bonds.len();
        self.donated[bond.donor].push(slot);
        self.accepted[bond.acceptor].push(slot);
        self.bonds.push(bond);
    }

    pub fn bonds(&self) -> &[HydrogenBond] {
        &self.bonds
    }

    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    /// Bonds in which the residue at `position` donates its amide hydrogen.
    pub fn n_terminal(&self, position: usize) -> impl Iterator<Item = &HydrogenBond> {
        self.donated
            .get(position)
            .into_iter()
            .flatten()
            .map(|&slot| &self.bonds[slot])
    }

    /// Bonds in which the residue at `position` accepts through its carbonyl.
    pub fn c_terminal(&self, position: usize) -> impl Iterator<Item = &HydrogenBond> {
        self.accepted
            .get(position)
            .into_iter()
            .flatten()
            .map(|&slot| &self.bonds[slot])
    }

    /// Sorted, deduplicated positions bonded to `position` in either direction.
    pub fn partners(&self, position: usize) -> Vec<usize> {
        let mut partners: Vec<usize> = self
            .n_terminal(position)
            .chain(self.c_terminal(position))
            .filter_map(|b| b.partner_of(position))
            .collect();
        partners.sort_unstable();
        partners.dedup();
        partners
    }

    pub fn are_bonded(&self, a: usize, b: usize) -> bool {
        self.n_terminal(a)
            .chain(self.c_terminal(a))
            .any(|bond| bond.partner_of(a) == Some(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bond(donor: usize, acceptor: usize, separation: isize) -> HydrogenBond {
        HydrogenBond {
            donor,
            acceptor,
            distance: 2.0,
            nho_angle: 160.0,
            hoc_angle: 150.0,
            separation,
        }
    }

    #[test]
    fn helix_separation_covers_three_to_five_in_either_sign() {
        assert!(bond(4, 0, 4).has_helix_separation());
        assert!(bond(0, 3, -3).has_helix_separation());
        assert!(!bond(0, 2, -2).has_helix_separation());
        assert!(!bond(10, 0, 10).has_helix_separation());
    }

    #[test]
    fn partner_of_returns_other_end() {
        let b = bond(7, 2, 5);
        assert_eq!(b.partner_of(7), Some(2));
        assert_eq!(b.partner_of(2), Some(7));
        assert_eq!(b.partner_of(3), None);
        assert!(b.involves(2) && !b.involves(3));
    }

    #[test]
    fn network_indexes_bonds_by_direction() {
        let mut network = HBondNetwork::new(10);
        network.add(bond(4, 0, 4));
        network.add(bond(5, 1, 4));
        network.add(bond(0, 9, -9));

        assert_eq!(network.len(), 3);
        assert_eq!(network.n_terminal(4).count(), 1);
        assert_eq!(network.c_terminal(0).count(), 1);
        assert_eq!(network.n_terminal(0).next().unwrap().acceptor, 9);
        assert_eq!(network.partners(0), vec![4, 9]);
        assert!(network.are_bonded(9, 0));
        assert!(!network.are_bonded(1, 4));
    }

    #[test]
    fn network_grows_for_out_of_range_positions_and_empty_lookups_are_safe() {
        let mut network = HBondNetwork::new(0);
        assert!(network.is_empty());
        assert_eq!(network.n_terminal(3).count(), 0);
        network.add(bond(6, 2, 4));
        assert_eq!(network.partners(6), vec![2]);
        assert!(network.partners(100).is_empty());
    }
}

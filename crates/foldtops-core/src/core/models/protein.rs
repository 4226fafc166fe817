use super::chain::{Chain, ChainType};
use super::ids::ChainId;
use slotmap::SlotMap;
use std::collections::HashMap;

/// A named collection of chains in input order.
#[derive(Debug, Clone, Default)]
pub struct Protein {
    /// Structure identifier used as a prefix for topology names (e.g., a PDB code).
    pub name: String,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Chain IDs in the order they were first added.
    chain_order: Vec<ChainId>,
    /// Lookup from single-character label to chain ID.
    chain_id_map: HashMap<char, ChainId>,
}

impl Protein {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    pub fn chain_mut(&mut self, id: ChainId) -> Option<&mut Chain> {
        self.chains.get_mut(id)
    }

    /// Chains in input order.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|c| (id, c)))
    }

    pub fn chain_count(&self) -> usize {
        self.chain_order.len()
    }

    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Adds a new chain or returns the existing one with the same label.
    pub fn add_chain(&mut self, id: char, chain_type: ChainType) -> ChainId {
        if let Some(&existing) = self.chain_id_map.get(&id) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(id, chain_type));
        self.chain_id_map.insert(id, chain_id);
        self.chain_order.push(chain_id);
        chain_id
    }

    /// Inserts a fully built chain, replacing any chain with the same label.
    pub fn insert_chain(&mut self, chain: Chain) -> ChainId {
        if let Some(&existing) = self.chain_id_map.get(&chain.id) {
            self.chains[existing] = chain;
            return existing;
        }
        let id = chain.id;
        let chain_id = self.chains.insert(chain);
        self.chain_id_map.insert(id, chain_id);
        self.chain_order.push(chain_id);
        chain_id
    }

    pub fn remove_chain(&mut self, id: ChainId) -> Option<Chain> {
        let chain = self.chains.remove(id)?;
        self.chain_order.retain(|&c| c != id);
        self.chain_id_map.remove(&chain.id);
        Some(chain)
    }

    pub fn residue_count(&self) -> usize {
        self.chains.values().map(Chain::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_chain_is_idempotent_per_label() {
        let mut protein = Protein::new("1abc");
        let a = protein.add_chain('A', ChainType::Protein);
        let again = protein.add_chain('A', ChainType::Other);
        assert_eq!(a, again);
        assert_eq!(protein.chain_count(), 1);
        assert_eq!(protein.chain(a).unwrap().chain_type, ChainType::Protein);
    }

    #[test]
    fn chains_iter_preserves_insertion_order() {
        let mut protein = Protein::new("1abc");
        protein.add_chain('B', ChainType::Protein);
        protein.add_chain('A', ChainType::Protein);
        protein.add_chain('C', ChainType::Water);
        let labels: Vec<_> = protein.chains_iter().map(|(_, c)| c.id).collect();
        assert_eq!(labels, vec!['B', 'A', 'C']);
    }

    #[test]
    fn insert_chain_replaces_same_label() {
        let mut protein = Protein::new("x");
        let id = protein.add_chain('A', ChainType::Protein);
        let mut replacement = Chain::new('A', ChainType::Protein);
        replacement.push_residue(1, "GLY");
        assert_eq!(protein.insert_chain(replacement), id);
        assert_eq!(protein.residue_count(), 1);
    }

    #[test]
    fn remove_chain_clears_lookup_tables() {
        let mut protein = Protein::new("x");
        let id = protein.add_chain('A', ChainType::Protein);
        assert!(protein.remove_chain(id).is_some());
        assert!(protein.find_chain_by_id('A').is_none());
        assert_eq!(protein.chains_iter().count(), 0);
        assert!(protein.remove_chain(id).is_none());
    }
}

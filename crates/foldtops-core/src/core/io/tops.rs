//! Rendering of chain topologies as TOPS strings.
//!
//! A TOPS string has three space-separated fields: the name (chain label followed by
//! the domain number), one vertex character per visible segment and the sorted edge
//! list, e.g. `A0 NEHEC 1:3PR`.

use crate::core::models::domain::{ChainDomainMap, Domain};
use crate::core::models::edge::{Edge, EdgeTag};
use crate::core::models::ids::SegmentId;
use crate::core::models::segment::SegmentKind;
use crate::core::models::topology::{ChainTopology, ProteinTopology};
use std::collections::HashMap;

/// Segments shown for a domain, with their display numbers.
struct Vertices {
    symbols: String,
    numbers: HashMap<SegmentId, usize>,
}

fn collect_vertices(topology: &ChainTopology, domain: &Domain) -> Vertices {
    let mut symbols = String::new();
    let mut numbers = HashMap::new();
    let mut next = 0;

    if !domain.is_empty() {
        symbols.push('N');
        next += 1;
    }
    for (position, segment) in topology.segments().iter().enumerate() {
        if segment.kind == SegmentKind::UnstructuredLoop {
            continue;
        }
        if !domain.is_empty() && (segment.kind.is_terminus() || !domain.contains_segment(segment))
        {
            continue;
        }
        let Some(symbol) = segment.symbol() else {
            continue;
        };
        symbols.push(symbol);
        numbers.insert(SegmentId(position), next);
        next += 1;
    }
    if !domain.is_empty() {
        symbols.push('C');
    }

    Vertices { symbols, numbers }
}

fn in_domain(topology: &ChainTopology, domain: &Domain, id: SegmentId) -> bool {
    topology
        .segment(id)
        .is_some_and(|segment| domain.contains_segment(segment))
}

/// Sheet partnerships inside the domain, merged with the chirality edges.
///
/// Edges are returned sorted by segment order and still refer to segment ids.
pub fn domain_edges(topology: &ChainTopology, domain: &Domain) -> Vec<Edge> {
    let mut edges: Vec<Edge> = Vec::new();
    for sheet in topology.sheets() {
        for (key, partner) in sheet.pairs() {
            if !in_domain(topology, domain, key) || !in_domain(topology, domain, partner) {
                continue;
            }
            let (Some(a), Some(b)) = (topology.segment(key), topology.segment(partner)) else {
                continue;
            };
            let edge = Edge::new(key, partner, EdgeTag::Relation(a.axis.relation_to(&b.axis)));
            if !edges.iter().any(|e| e.same_pair(&edge)) {
                edges.push(edge);
            }
        }
    }
    edges.sort_by_key(|e| (e.first, e.second));

    for chiral in topology.chiralities() {
        match edges.iter_mut().find(|e| e.same_pair(chiral)) {
            Some(existing) => existing.merge_with(chiral),
            None => {
                if in_domain(topology, domain, chiral.first)
                    && in_domain(topology, domain, chiral.second)
                {
                    edges.push(chiral.clone());
                }
            }
        }
    }
    edges.sort_by_key(|e| (e.first, e.second));
    edges
}

/// Renders one chain restricted to `domain`.
pub fn tops_string(topology: &ChainTopology, domain: &Domain) -> String {
    let vertices = collect_vertices(topology, domain);
    let edges: String = domain_edges(topology, domain)
        .iter()
        .filter_map(|edge| {
            let first = vertices.numbers.get(&edge.first)?;
            let second = vertices.numbers.get(&edge.second)?;
            Some(format!("{first}:{second}{}", edge.tag_string()))
        })
        .collect();

    format!(
        "{}{} {} {}",
        topology.label(),
        domain.number,
        vertices.symbols,
        edges
    )
}

/// One string per domain, in the order given.
pub fn tops_strings(topology: &ChainTopology, domains: &[Domain]) -> Vec<(usize, String)> {
    domains
        .iter()
        .map(|domain| (domain.number, tops_string(topology, domain)))
        .collect()
}

/// Strings for every analysed chain, prefixed with the structure name.
pub fn protein_tops_strings(topology: &ProteinTopology, domains: &ChainDomainMap) -> Vec<String> {
    topology
        .chains
        .iter()
        .flat_map(|chain| {
            tops_strings(chain, &domains.domains_for(&chain.label()))
                .into_iter()
                .map(|(_, value)| format!("{}{}", topology.name, value))
        })
        .collect()
}

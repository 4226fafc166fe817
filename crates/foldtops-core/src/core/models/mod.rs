//! # Core Models Module
//!
//! Data structures for protein backbones and the topology derived from them.
//!
//! ## Overview
//!
//! Input side: atoms, residues and chains grouped into a [`protein::Protein`], filled
//! through [`builder::ProteinBuilder`]. Residues are addressed by their position in
//! the chain's residue list and carry a chain-relative absolute index that leaves
//! gaps at chain breaks.
//!
//! Analysis side: the hydrogen-bond network, backbone segments with their axes,
//! sheets, edges, domains and the frozen [`topology::ChainTopology`].
//!
//! ## Key Components
//!
//! - [`atom`], [`residue`], [`chain`], [`protein`] - Atomic chain model
//! - [`builder`] - Incremental construction from atom records
//! - [`hbond`] - Backbone hydrogen bonds and the per-chain bond network
//! - [`axis`], [`segment`] - Secondary-structure elements and their geometry
//! - [`sheet`], [`edge`] - Strand partnership graphs and labelled segment pairs
//! - [`domain`] - Sequence-number domains and the chain domain map
//! - [`topology`] - Per-chain and per-protein analysis results
//! - [`ids`] - Identifier types for chains and segments

pub mod atom;
pub mod axis;
pub mod builder;
pub mod chain;
pub mod domain;
pub mod edge;
pub mod hbond;
pub mod ids;
pub mod protein;
pub mod residue;
pub mod segment;
pub mod sheet;
pub mod topology;

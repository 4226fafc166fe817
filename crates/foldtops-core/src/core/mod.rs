//! # Core Module
//!
//! Stateless building blocks shared by the analysis stages.
//!
//! - **Structural Representation** ([`models`]) - Residues, chains, proteins, hydrogen
//!   bonds, segments, sheets, edges, domains and frozen chain topologies
//! - **File I/O** ([`io`]) - Backbone table ingestion and TOPS string serialisation
//! - **Utilities** ([`utils`]) - Vector geometry and residue name tables

pub mod io;
pub mod models;
pub mod utils;

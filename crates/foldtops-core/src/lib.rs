//! # FoldTops Core Library
//!
//! Derives TOPS topology descriptions of protein chains from backbone coordinates:
//! backbone hydrogen bonds are detected, residues are classified by their bonding
//! environment, helices and strands are assembled into segments, strands are grouped
//! into sheets, every segment is oriented, crossover connections receive a hand, and
//! the result is serialised as a compact TOPS string.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Plain data models (`Protein`, `Chain`, `Residue`,
//!   segments, sheets, edges and domains), geometry helpers, and I/O for backbone
//!   tables and TOPS strings.
//!
//! - **[`engine`]: The Stages.** Configuration, errors, progress reporting and the
//!   individual analysis passes over one chain.
//!
//! - **[`workflows`]: The Public API.** Runs the full pipeline over a structure and
//!   returns a [`ProteinTopology`](core::models::topology::ProteinTopology).

pub mod core;
pub mod engine;
pub mod workflows;

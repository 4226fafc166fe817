//! Stateless helpers shared by the models and the analysis engine: vector geometry on
//! `nalgebra` points and static lookup tables for atom and residue names.

pub mod geometry;
pub mod identifiers;

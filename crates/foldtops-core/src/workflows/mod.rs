//! # Workflows Module
//!
//! End-to-end entry points that tie the [`engine`](crate::engine) stages together.
//!
//! - **Analysis Workflow** ([`analyze`]) - Runs the full topology pipeline on every
//!   protein chain of a structure, collecting per-chain failures instead of aborting.

pub mod analyze;

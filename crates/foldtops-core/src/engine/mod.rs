//! # Engine Module
//!
//! Per-chain analysis machinery behind the [`workflows`](crate::workflows) layer.
//!
//! - **Configuration** ([`config`]) - Hydrogen-bond criteria, analysis mode and sheet thresholds
//! - **Error Handling** ([`error`]) - Engine-level error type
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Stages** ([`tasks`]) - The individual analysis passes over a chain

pub mod config;
pub mod error;
pub mod progress;
pub mod tasks;

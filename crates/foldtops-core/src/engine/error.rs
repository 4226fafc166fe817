use thiserror::Error;

use super::config::ConfigError;

/// Errors that abort the analysis of a chain.
///
/// The workflow layer turns these into per-chain failures rather than stopping the run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

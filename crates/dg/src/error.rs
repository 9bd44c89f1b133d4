//! CLI error types.

use dg_config::ConfigError;
use dg_model::ModelError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Model(#[from] ModelError),

    #[error("{failed} of {total} output formats failed")]
    Generate { failed: usize, total: usize },

    #[error("{0}")]
    Validation(String),
}

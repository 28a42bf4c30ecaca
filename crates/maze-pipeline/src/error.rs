//! Pipeline error types

use thiserror::Error;

/// Errors that end a run outright, as opposed to a reported step failure
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid provider '{0}': expected one of aws, azure, gcp")]
    ProviderInvalid(String),

    #[error(transparent)]
    Config(#[from] maze_config::ConfigError),

    #[error(transparent)]
    Bundle(#[from] maze_bundle::BundleError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

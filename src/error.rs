use resource_framework::{ConfigError, TransportError};
use std::path::PathBuf;
use thiserror::Error;

/// Failures while assembling the dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("config file {path} does not exist")]
    MissingConfig { path: PathBuf },

    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP transport: {0}")]
    Transport(#[from] TransportError),
}

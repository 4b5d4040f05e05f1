//! Error types for configuration loading.
//!
//! Catalog scans and metadata probes do not fail as a whole; their
//! per-entry failures are absorbed into degraded entries instead.

use thiserror::Error;

/// Errors that can occur while loading explorer configuration.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration parsed but holds values the explorer cannot use.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for results with [`DiscoveryError`].
pub type Result<T> = std::result::Result<T, DiscoveryError>;

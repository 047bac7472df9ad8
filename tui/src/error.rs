//! Error Types
//!
//! The compositors degrade silently on malformed state, so the only runtime
//! error they surface is a rejected argument. Configuration loading has its
//! own error type.

use thiserror::Error;

/// Errors returned by compositor mutations
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompositorError {
    /// A caller-supplied argument was rejected
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors returned while loading a [`TreeStyle`](crate::config::TreeStyle)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed
    #[error("failed to parse style configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value was present but not usable
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Configuration key or environment variable
        key: String,
        /// The rejected raw value
        value: String,
    },
}

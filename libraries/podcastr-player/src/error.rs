//! Error types for player state management
//!
//! The player operations themselves are total; errors only surface from
//! configuration and from the strict `try_play_list` entry point.

use thiserror::Error;

/// Player errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Start index does not point into the episode list
    #[error("Index {index} out of bounds for list of {len} episodes")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration was read but holds an unusable value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<config::ConfigError> for PlayerError {
    fn from(err: config::ConfigError) -> Self {
        PlayerError::Config(err.to_string())
    }
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;

//! Common error types for persona

use thiserror::Error;

/// Common result type for persona operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across persona crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML config file could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Stored data that cannot be decoded into a domain value
    #[error("Internal error: {0}")]
    Internal(String),
}

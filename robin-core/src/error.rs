#![forbid(unsafe_code)]

//! Common error type for Robin crates.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RobinError {
    /// Item weights must be strictly positive.
    #[error("invalid weight {weight}: weights must be greater than zero")]
    InvalidWeight { weight: u32 },

    /// Selection requested from a selector with no registered items.
    #[error("cannot select from an empty selector")]
    EmptySelection,

    /// I/O related failures.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parsing failures.
    #[error("Config parse error: {0}")]
    ConfigParse(toml::de::Error),
}

/// Convenient alias for results throughout Robin crates.
pub type RobinResult<T> = Result<T, RobinError>;

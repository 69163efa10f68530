#![forbid(unsafe_code)]

pub mod config;
pub mod error;

pub use config::{ItemConfig, RobinConfig};
pub use error::{RobinError, RobinResult};

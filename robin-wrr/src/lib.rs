#![forbid(unsafe_code)]

//! Thread-safe weighted round-robin selection.
//!
//! ```rust
//! use robin_wrr::WeightedSelector;
//! let sel = WeightedSelector::new();
//! sel.add("primary", 3).unwrap();
//! sel.add("standby", 1).unwrap();
//! assert_eq!(sel.next(), Some("primary"));
//! ```

pub mod selector;

pub use robin_core::{RobinError, RobinResult};
pub use selector::WeightedSelector;

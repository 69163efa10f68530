#![forbid(unsafe_code)]

//! Robin configuration handling. Parses a TOML file describing a weighted item table into a
//! strongly-typed structure. The selector crate turns a validated [`RobinConfig`] into a live
//! selector; this module only knows about the on-disk shape.

use serde::Deserialize;
use std::{fs, path::Path, str::FromStr};
use tracing::debug;

use crate::{RobinError, RobinResult};

/// One weighted entry of the `[[items]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemConfig {
    /// Opaque payload handed back by the selector (backend address, worker name, ...).
    pub name: String,

    /// Relative selection frequency. Must be greater than zero.
    pub weight: u32,
}

/// Primary configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RobinConfig {
    /// Logging verbosity (`error`, `warn`, `info`, `debug`, `trace`) a host binary should install.
    pub log_level: Option<String>,

    /// Weighted items, in insertion order.
    pub items: Vec<ItemConfig>,
}

impl Default for RobinConfig {
    fn default() -> Self {
        Self {
            log_level: Some(default_log_level()),
            items: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl FromStr for RobinConfig {
    type Err = RobinError;

    fn from_str(data: &str) -> RobinResult<Self> {
        toml::from_str::<RobinConfig>(data).map_err(RobinError::ConfigParse)
    }
}

impl RobinConfig {
    /// Load a configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RobinResult<Self> {
        let data = fs::read_to_string(&path)?;
        let cfg: RobinConfig = data.parse()?;
        debug!(path = %path.as_ref().display(), items = cfg.items.len(), "loaded config");
        Ok(cfg)
    }

    /// Load config alias version
    pub fn load<P: AsRef<Path>>(path: P) -> RobinResult<Self> {
        Self::from_file(path)
    }

    /// Reject entries the selector would refuse, before any of them is registered.
    pub fn validate(&self) -> RobinResult<()> {
        match self.items.iter().find(|item| item.weight == 0) {
            Some(item) => Err(RobinError::InvalidWeight { weight: item.weight }),
            None => Ok(()),
        }
    }

    /// Sum of all configured weights, i.e. the cycle length of a selector built from this table.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.weight)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_item_table() {
        let cfg: RobinConfig = r#"
            log_level = "debug"

            [[items]]
            name = "10.0.0.1:8080"
            weight = 5

            [[items]]
            name = "10.0.0.2:8080"
            weight = 1
        "#
        .parse()
        .unwrap();

        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert_eq!(cfg.items.len(), 2);
        assert_eq!(cfg.items[0], ItemConfig { name: "10.0.0.1:8080".into(), weight: 5 });
        assert_eq!(cfg.total_weight(), 6);
        cfg.validate().unwrap();
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let cfg: RobinConfig = "".parse().unwrap();
        assert_eq!(cfg.log_level.as_deref(), Some("info"));
        assert!(cfg.items.is_empty());
        assert_eq!(cfg.total_weight(), 0);
    }

    #[test]
    fn negative_weight_is_a_parse_error() {
        let err = "[[items]]\nname = \"a\"\nweight = -3\n".parse::<RobinConfig>().unwrap_err();
        assert!(matches!(err, RobinError::ConfigParse(_)));
    }

    #[test]
    fn zero_weight_fails_validation() {
        let cfg: RobinConfig = "[[items]]\nname = \"a\"\nweight = 0\n".parse().unwrap();
        assert!(matches!(cfg.validate(), Err(RobinError::InvalidWeight { weight: 0 })));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[items]]\nname = \"worker-1\"\nweight = 3").unwrap();
        let cfg = RobinConfig::load(file.path()).unwrap();
        assert_eq!(cfg.items, vec![ItemConfig { name: "worker-1".into(), weight: 3 }]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RobinConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, RobinError::Io(_)));
    }
}

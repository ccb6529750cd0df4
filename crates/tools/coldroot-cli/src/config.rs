use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Optional settings for the `coldroot` CLI, read from a TOML file.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Log filter (e.g., "info", "coldroot_identity=debug"). `RUST_LOG` wins.
    pub log_level: Option<String>,

    /// Lineage event kind used by `derive-epoch` when `--kind` is not given.
    pub default_kind: Option<u32>,

    /// Vector file used by `vectors` when no path is given.
    pub vectors_path: Option<PathBuf>,
}

impl CliConfig {
    /// Load the config at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {:?}", path))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse configuration file: {:?}", path))
    }
}

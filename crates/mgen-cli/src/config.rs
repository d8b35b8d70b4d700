use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use mgen_crypto::{HashAlgorithm, LeafEncoding};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Settings for building the tree.
///
/// Read from an optional TOML file; command-line flags override file values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
    /// JSON file holding the array of leaf values. A relative path in a
    /// config file is resolved against the file's directory.
    pub leaves: PathBuf,
    /// Hash applied to leaves and node pairs.
    pub hash: HashAlgorithm,
    /// How leaf strings become bytes.
    pub encoding: LeafEncoding,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            leaves: PathBuf::from("all.json"),
            hash: HashAlgorithm::Keccak256,
            encoding: LeafEncoding::Auto,
        }
    }
}

impl GenConfig {
    /// Load a TOML config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: Self =
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        if config.leaves.is_relative() {
            if let Some(dir) = path.parent() {
                config.leaves = dir.join(&config.leaves);
            }
        }
        Ok(config)
    }

    /// Merge the config file named on the command line with the flags.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(leaves) = &cli.leaves {
            config.leaves = leaves.clone();
        }
        if let Some(hash) = cli.hash {
            config.hash = hash;
        }
        if let Some(encoding) = cli.encoding {
            config.encoding = encoding;
        }
        Ok(config)
    }
}

use std::fs;
use std::path::Path;

use anyhow::Context;
use mgen_crypto::MerkleError;
use serde_json::Value;

/// Read a JSON array of leaf strings from disk.
pub fn load_leaves(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading leaf set {}", path.display()))?;
    parse_leaves(&text).with_context(|| format!("loading leaf set {}", path.display()))
}

/// Parse a JSON array of leaf strings.
///
/// Entries that are not strings fail with [`MerkleError::InvalidLeaf`].
pub fn parse_leaves(json: &str) -> anyhow::Result<Vec<String>> {
    let value: Value = serde_json::from_str(json).context("leaf set is not valid JSON")?;
    let Value::Array(entries) = value else {
        anyhow::bail!("leaf set must be a JSON array");
    };
    let leaves = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::String(s) => Ok(s),
            other => Err(MerkleError::InvalidLeaf {
                index,
                reason: format!("expected a string, got {other}"),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(leaves)
}

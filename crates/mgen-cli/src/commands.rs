use anyhow::Context;
use colored::Colorize;
use mgen_crypto::{verify_hex, HashAlgorithm, MerkleError, MerkleHasher, MerkleTree};
use serde_json::json;
use tracing::info;

use crate::cli::*;
use crate::config::GenConfig;
use crate::leaves::load_leaves;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let output = execute(&cli)?;
    println!("{output}");
    Ok(())
}

/// Run a command and return what it prints.
pub fn execute(cli: &Cli) -> anyhow::Result<String> {
    let config = GenConfig::resolve(cli)?;
    let json = matches!(cli.format, OutputFormat::Json);
    match &cli.command {
        Command::Root => Ok(cmd_root(&build_tree(&config)?, json)),
        Command::Proof(args) => cmd_proof(&config, &build_tree(&config)?, args, json),
        Command::Tree => cmd_tree(&build_tree(&config)?, json),
        Command::TreeJson => cmd_tree(&build_tree(&config)?, true),
        // Hashing one value needs no leaf set.
        Command::Leaf(args) => cmd_leaf(&config, args, json),
        Command::Verify(args) => cmd_verify(&config, &build_tree(&config)?, args, json),
    }
}

fn build_tree(config: &GenConfig) -> anyhow::Result<MerkleTree<HashAlgorithm>> {
    let values = load_leaves(&config.leaves)?;
    let tree = MerkleTree::from_encoded(config.hash, &values, config.encoding)
        .with_context(|| format!("building tree from {}", config.leaves.display()))?;
    info!(
        leaves = tree.leaf_count(),
        path = %config.leaves.display(),
        hash = %config.hash,
        "loaded leaf set"
    );
    Ok(tree)
}

fn encode(config: &GenConfig, value: &str) -> anyhow::Result<Vec<u8>> {
    config
        .encoding
        .encode(value)
        .map_err(|reason| anyhow::anyhow!("invalid value {value:?}: {reason}"))
}

fn cmd_root(tree: &MerkleTree<HashAlgorithm>, json: bool) -> String {
    if json {
        json!({ "root": tree.root() }).to_string()
    } else {
        tree.root().to_string()
    }
}

fn cmd_proof(
    config: &GenConfig,
    tree: &MerkleTree<HashAlgorithm>,
    args: &ProofArgs,
    json: bool,
) -> anyhow::Result<String> {
    let bytes = encode(config, &args.address)?;
    let proof = tree
        .proof(&bytes)
        .with_context(|| format!("no proof for claimer {}", args.address))?;
    let hex = proof.to_hex();
    if json {
        return Ok(serde_json::to_string(&hex)?);
    }
    if hex.is_empty() {
        info!(address = %args.address, "single-leaf tree, proof is empty");
        return Ok("[]".to_string());
    }
    Ok(hex.join("\n"))
}

fn cmd_tree(tree: &MerkleTree<HashAlgorithm>, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string(&tree.snapshot())?);
    }
    Ok(format!(
        "{} {} leaves, depth {}, {}\n{}",
        "tree:".bold(),
        tree.leaf_count(),
        tree.depth(),
        tree.hasher().name().cyan(),
        tree.to_string().trim_end()
    ))
}

fn cmd_leaf(config: &GenConfig, args: &LeafArgs, json: bool) -> anyhow::Result<String> {
    let digest = config.hash.hash(&encode(config, &args.value)?);
    if json {
        return Ok(json!({ "value": args.value, "leaf": digest }).to_string());
    }
    Ok(digest.to_hex())
}

fn cmd_verify(
    config: &GenConfig,
    tree: &MerkleTree<HashAlgorithm>,
    args: &VerifyArgs,
    json: bool,
) -> anyhow::Result<String> {
    let bytes = encode(config, &args.address)?;
    let proof = if args.proof.is_empty() {
        // An address outside the leaf set has no path; it checks as not included.
        match tree.proof(&bytes) {
            Ok(proof) => proof.to_hex(),
            Err(MerkleError::LeafNotFound(_)) => Vec::new(),
            Err(e) => return Err(e.into()),
        }
    } else {
        args.proof.clone()
    };
    let root = args
        .root
        .clone()
        .unwrap_or_else(|| tree.root().to_prefixed_hex());

    let valid = verify_hex(&config.hash, &bytes, &proof, &root)?;
    info!(address = %args.address, valid, "verified inclusion proof");

    if json {
        return Ok(json!({
            "address": args.address,
            "root": root,
            "proof": proof,
            "valid": valid,
        })
        .to_string());
    }
    let verdict = if valid {
        format!("{} included", "✓".green().bold())
    } else {
        format!("{} not included", "✗".red().bold())
    };
    Ok(format!(
        "{verdict}\n  Address: {}\n  Root: {}\n  Proof: [{}]",
        args.address,
        root,
        proof.join(", ")
    ))
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mgen_crypto::{HashAlgorithm, LeafEncoding};

#[derive(Parser)]
#[command(
    name = "mgen",
    about = "Merkle roots and inclusion proofs for airdrop address lists",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON file holding the array of leaf values
    #[arg(short, long, global = true)]
    pub leaves: Option<PathBuf>,

    /// Leaf hash: keccak256 or blake3
    #[arg(long, global = true)]
    pub hash: Option<HashAlgorithm>,

    /// Leaf encoding: auto, hex or utf8
    #[arg(long, global = true)]
    pub encoding: Option<LeafEncoding>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the Merkle root
    #[command(visible_alias = "r")]
    Root,
    /// Print the inclusion proof for an address
    #[command(visible_alias = "p")]
    Proof(ProofArgs),
    /// Print every layer of the tree
    #[command(visible_alias = "t")]
    Tree,
    /// Print the tree as JSON
    #[command(visible_alias = "tj")]
    TreeJson,
    /// Print the leaf hash of a value
    #[command(visible_alias = "l")]
    Leaf(LeafArgs),
    /// Verify that an address is included under a root
    #[command(visible_alias = "v")]
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct ProofArgs {
    pub address: String,
}

#[derive(Args)]
pub struct LeafArgs {
    pub value: String,
}

#[derive(Args)]
pub struct VerifyArgs {
    pub address: String,
    /// Proof elements; derived from the leaf set when omitted
    #[arg(long, value_delimiter = ',')]
    pub proof: Vec<String>,
    /// Claimed root; the leaf set's root when omitted
    #[arg(long)]
    pub root: Option<String>,
}

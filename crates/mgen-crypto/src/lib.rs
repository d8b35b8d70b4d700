//! Hashing and Merkle trees for merkle-gen.
//!
//! Provides pluggable leaf hashers (Keccak-256 by default, BLAKE3 as an
//! alternative), a binary Merkle tree over a fixed leaf list, and inclusion
//! proofs that verify without access to the tree.
//!
//! Sibling pairs are sorted before hashing, and an unpaired node at the end of
//! a layer is carried up unchanged. Together these make roots match the
//! sorted-pair trees commonly used for Ethereum airdrop claim lists.

pub mod error;
pub mod hasher;
pub mod leaf;
pub mod merkle;

pub use error::{MerkleError, MerkleResult};
pub use hasher::{Blake3Hasher, HashAlgorithm, Keccak256, MerkleHasher};
pub use leaf::LeafEncoding;
pub use merkle::{verify_hex, verify_proof, MerkleProof, MerkleTree, ProofNode, Side, TreeSnapshot};

use std::fmt;

use mgen_types::Digest;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MerkleError, MerkleResult};
use crate::hasher::{Keccak256, MerkleHasher};
use crate::leaf::LeafEncoding;

/// Side of a sibling in a Merkle proof path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// One step of an inclusion proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofNode {
    /// Sibling digest to combine with.
    pub digest: Digest,
    /// Which side the sibling sat on. Advisory only: `combine` sorts pairs,
    /// so verification never reads it. `None` for proofs parsed from hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
}

/// Merkle inclusion proof: sibling digests ordered from the leaf layer up.
///
/// Levels where the proven node was carried up unpaired contribute no
/// element, so a proof can be shorter than the tree depth.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub path: Vec<ProofNode>,
}

impl MerkleProof {
    /// Number of sibling digests.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// True for the proof of a single-leaf tree.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Sibling digests in order, without side hints.
    pub fn digests(&self) -> impl Iterator<Item = &Digest> {
        self.path.iter().map(|node| &node.digest)
    }

    /// Fold the path over a leaf digest, yielding the implied root.
    pub fn compute_root<H: MerkleHasher>(&self, hasher: &H, leaf: Digest) -> Digest {
        self.digests()
            .fold(leaf, |acc, sibling| hasher.combine(&acc, sibling))
    }

    /// External representation: `0x`-prefixed hex digests, hints dropped.
    pub fn to_hex(&self) -> Vec<String> {
        self.digests().map(Digest::to_prefixed_hex).collect()
    }

    /// Parse the external representation.
    pub fn from_hex<S: AsRef<str>>(elements: &[S]) -> MerkleResult<Self> {
        let path = elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                Digest::from_hex(element.as_ref())
                    .map(|digest| ProofNode { digest, side: None })
                    .map_err(|e| MerkleError::MalformedProof {
                        index: Some(index),
                        reason: e.to_string(),
                    })
            })
            .collect::<MerkleResult<Vec<_>>>()?;
        Ok(Self { path })
    }
}

/// Verify that `leaf` is committed to by `root` through `proof`.
///
/// Needs no tree, only the hasher the tree was built with. A mismatch is
/// `false`, never an error.
pub fn verify_proof<H: MerkleHasher>(
    hasher: &H,
    leaf: &[u8],
    proof: &MerkleProof,
    root: &Digest,
) -> bool {
    proof.compute_root(hasher, hasher.hash(leaf)) == *root
}

/// [`verify_proof`] over the external hex representation.
///
/// Fails with [`MerkleError::MalformedProof`] when a proof element or the
/// root is not a 32-byte hex digest.
pub fn verify_hex<H: MerkleHasher, S: AsRef<str>>(
    hasher: &H,
    leaf: &[u8],
    proof: &[S],
    root: &str,
) -> MerkleResult<bool> {
    let proof = MerkleProof::from_hex(proof)?;
    let root = Digest::from_hex(root).map_err(|e| MerkleError::MalformedProof {
        index: None,
        reason: e.to_string(),
    })?;
    Ok(verify_proof(hasher, leaf, &proof, &root))
}

/// Binary Merkle tree with sorted-pair hashing.
///
/// Built once from an ordered leaf list and never mutated afterwards, so a
/// shared tree can serve proofs from several threads.
///
/// When a layer has an odd number of nodes the last one is carried up to the
/// next layer unchanged. It is neither duplicated nor hashed with itself.
#[derive(Clone, Debug)]
pub struct MerkleTree<H: MerkleHasher = Keccak256> {
    hasher: H,
    /// The root hash of the tree.
    root: Digest,
    /// Level 0 = leaf digests in input order, last level = `[root]`.
    layers: Vec<Vec<Digest>>,
}

impl<H: MerkleHasher> MerkleTree<H> {
    /// Build a tree by hashing each raw value into a leaf.
    pub fn new<V: AsRef<[u8]>>(hasher: H, values: &[V]) -> MerkleResult<Self> {
        let leaves = values.iter().map(|v| hasher.hash(v.as_ref())).collect();
        Self::from_leaf_digests(hasher, leaves)
    }

    /// Build a tree from textual values, validating each one before hashing.
    pub fn from_encoded<S: AsRef<str>>(
        hasher: H,
        values: &[S],
        encoding: LeafEncoding,
    ) -> MerkleResult<Self> {
        let leaves = values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                encoding
                    .encode(value.as_ref())
                    .map(|bytes| hasher.hash(&bytes))
                    .map_err(|reason| MerkleError::InvalidLeaf { index, reason })
            })
            .collect::<MerkleResult<Vec<_>>>()?;
        Self::from_leaf_digests(hasher, leaves)
    }

    /// Build a tree from already-hashed leaves.
    pub fn from_leaf_digests(hasher: H, leaves: Vec<Digest>) -> MerkleResult<Self> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyLeafSet);
        }

        let leaf_count = leaves.len();
        let mut layers = Vec::new();
        let mut current = leaves;

        while current.len() > 1 {
            let next: Vec<Digest> = current
                .chunks(2)
                .map(|pair| match pair.get(1) {
                    Some(right) => hasher.combine(&pair[0], right),
                    None => pair[0],
                })
                .collect();
            layers.push(current);
            current = next;
        }

        let root = current[0];
        layers.push(current);

        debug!(
            leaves = leaf_count,
            depth = layers.len() - 1,
            hasher = hasher.name(),
            root = %root.short_hex(),
            "built Merkle tree"
        );

        Ok(Self {
            hasher,
            root,
            layers,
        })
    }

    /// The root hash of the tree.
    pub fn root(&self) -> Digest {
        self.root
    }

    /// Leaf digests in input order.
    pub fn leaves(&self) -> &[Digest] {
        &self.layers[0]
    }

    /// Every layer, leaves first.
    pub fn layers(&self) -> &[Vec<Digest>] {
        &self.layers
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Number of combine steps between the leaves and the root.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// The hasher the tree was built with.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Hash a raw value the way leaves are hashed.
    pub fn hash_leaf(&self, value: &[u8]) -> Digest {
        self.hasher.hash(value)
    }

    /// Index of the first leaf with this digest.
    pub fn leaf_index(&self, leaf: &Digest) -> Option<usize> {
        self.leaves().iter().position(|l| l == leaf)
    }

    /// Whether a raw value is one of the leaves.
    pub fn contains(&self, value: &[u8]) -> bool {
        self.leaf_index(&self.hash_leaf(value)).is_some()
    }

    /// Generate an inclusion proof for a raw value.
    pub fn proof(&self, value: &[u8]) -> MerkleResult<MerkleProof> {
        self.proof_for_digest(&self.hash_leaf(value))
    }

    /// Generate an inclusion proof for a leaf digest.
    pub fn proof_for_digest(&self, leaf: &Digest) -> MerkleResult<MerkleProof> {
        let index = self
            .leaf_index(leaf)
            .ok_or_else(|| MerkleError::LeafNotFound(leaf.to_prefixed_hex()))?;
        Ok(self.sibling_path(index))
    }

    /// Generate an inclusion proof for the leaf at `index`.
    pub fn proof_at(&self, index: usize) -> Option<MerkleProof> {
        (index < self.leaf_count()).then(|| self.sibling_path(index))
    }

    /// Walk from leaf `index` to the root collecting siblings. `index` must
    /// be a valid leaf position.
    fn sibling_path(&self, index: usize) -> MerkleProof {
        let mut path = Vec::new();
        let mut idx = index;

        for layer in &self.layers[..self.layers.len() - 1] {
            // A carried node has no sibling and contributes nothing.
            if let Some(sibling) = layer.get(idx ^ 1) {
                let side = if idx % 2 == 0 { Side::Right } else { Side::Left };
                path.push(ProofNode {
                    digest: *sibling,
                    side: Some(side),
                });
            }
            idx /= 2;
        }

        debug!(index, len = path.len(), "generated inclusion proof");
        MerkleProof { path }
    }

    /// Verify a proof for a raw value against `root` with this tree's hasher.
    pub fn verify(&self, value: &[u8], proof: &MerkleProof, root: &Digest) -> bool {
        verify_proof(&self.hasher, value, proof, root)
    }

    /// Serializable copy of the node array.
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            hash: self.hasher.name().to_string(),
            leaves: self.leaves().to_vec(),
            layers: self.layers.clone(),
            root: self.root,
        }
    }
}

impl<H: MerkleHasher> fmt::Display for MerkleTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let top = self.depth();
        for (level, layer) in self.layers.iter().enumerate().rev() {
            let label = match level {
                l if l == top => " (root)",
                0 => " (leaves)",
                _ => "",
            };
            writeln!(f, "layer {level}{label}")?;
            for (i, digest) in layer.iter().enumerate() {
                writeln!(f, "  [{i}] {digest}")?;
            }
        }
        Ok(())
    }
}

/// Node array of a tree in serializable form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Name of the hasher that built the tree.
    pub hash: String,
    pub leaves: Vec<Digest>,
    pub layers: Vec<Vec<Digest>>,
    pub root: Digest,
}

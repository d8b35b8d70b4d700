//! Error types for Merkle tree construction, proving and verification.

/// Errors that can occur while building trees or handling proofs.
///
/// A proof that simply does not match a root is not an error: verification
/// reports that as `false`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MerkleError {
    /// A tree was requested over zero leaves.
    #[error("cannot build a Merkle tree from an empty leaf set")]
    EmptyLeafSet,

    /// A leaf value failed validation before hashing.
    #[error("invalid leaf at index {index}: {reason}")]
    InvalidLeaf {
        /// Position of the leaf in the input list.
        index: usize,
        /// Why the value was rejected.
        reason: String,
    },

    /// A proof was requested for a value that is not in the leaf set.
    #[error("leaf not found in tree: {0}")]
    LeafNotFound(String),

    /// A proof element or root is structurally invalid.
    #[error("malformed proof {}: {reason}", location(.index))]
    MalformedProof {
        /// Offending proof element, or `None` when the root itself is malformed.
        index: Option<usize>,
        /// Why it was rejected.
        reason: String,
    },

    /// A hash algorithm name was not recognised.
    #[error("unknown hash algorithm: {0}")]
    UnknownHash(String),
}

fn location(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!("element {i}"),
        None => "root".to_string(),
    }
}

/// Convenience alias for Merkle results.
pub type MerkleResult<T> = Result<T, MerkleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_proof_message_names_element() {
        let err = MerkleError::MalformedProof {
            index: Some(3),
            reason: "bad".into(),
        };
        assert_eq!(err.to_string(), "malformed proof element 3: bad");
    }

    #[test]
    fn malformed_root_message() {
        let err = MerkleError::MalformedProof {
            index: None,
            reason: "bad".into(),
        };
        assert_eq!(err.to_string(), "malformed proof root: bad");
    }
}

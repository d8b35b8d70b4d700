use std::fmt;
use std::str::FromStr;

use mgen_types::{Digest, DIGEST_LEN};
use serde::{Deserialize, Serialize};
use tiny_keccak::{Hasher as _, Keccak};

use crate::error::MerkleError;

/// A one-way hash usable for Merkle trees.
///
/// Implementors only supply [`hash`](MerkleHasher::hash). The provided
/// [`combine`](MerkleHasher::combine) fixes how two sibling digests merge
/// into their parent, and both tree construction and proof verification go
/// through it, so they cannot disagree on operand order.
pub trait MerkleHasher: Clone + Send + Sync {
    /// Hash arbitrary bytes into a digest.
    fn hash(&self, data: &[u8]) -> Digest;

    /// Short name used in logs and tree snapshots.
    fn name(&self) -> &'static str;

    /// Merge two sibling digests into their parent.
    ///
    /// The pair is sorted first: the digest that is smaller as a big-endian
    /// unsigned integer is hashed first. Roots committed by other sorted-pair
    /// implementations depend on this exact rule.
    fn combine(&self, a: &Digest, b: &Digest) -> Digest {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let mut buf = [0u8; DIGEST_LEN * 2];
        buf[..DIGEST_LEN].copy_from_slice(lo.as_bytes());
        buf[DIGEST_LEN..].copy_from_slice(hi.as_bytes());
        self.hash(&buf)
    }
}

/// Ethereum Keccak-256.
///
/// Default hasher: it reproduces roots already committed on-chain for
/// airdrop claim lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keccak256;

impl MerkleHasher for Keccak256 {
    fn hash(&self, data: &[u8]) -> Digest {
        let mut output = [0u8; DIGEST_LEN];
        let mut hasher = Keccak::v256();
        hasher.update(data);
        hasher.finalize(&mut output);
        Digest::from_hash(output)
    }

    fn name(&self) -> &'static str {
        "keccak256"
    }
}

/// Plain BLAKE3.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blake3Hasher;

impl MerkleHasher for Blake3Hasher {
    fn hash(&self, data: &[u8]) -> Digest {
        Digest::from_hash(*blake3::hash(data).as_bytes())
    }

    fn name(&self) -> &'static str {
        "blake3"
    }
}

/// Hash algorithm selected at runtime, e.g. from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Keccak256,
    Blake3,
}

impl HashAlgorithm {
    /// Every supported algorithm.
    pub const ALL: [Self; 2] = [Self::Keccak256, Self::Blake3];
}

impl MerkleHasher for HashAlgorithm {
    fn hash(&self, data: &[u8]) -> Digest {
        match self {
            Self::Keccak256 => Keccak256.hash(data),
            Self::Blake3 => Blake3Hasher.hash(data),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Keccak256 => Keccak256.name(),
            Self::Blake3 => Blake3Hasher.name(),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keccak256" | "keccak" => Ok(Self::Keccak256),
            "blake3" => Ok(Self::Blake3),
            _ => Err(MerkleError::UnknownHash(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_of_empty_input() {
        let expected =
            Digest::from_hex("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
                .unwrap();
        assert_eq!(Keccak256.hash(b""), expected);
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(Keccak256.hash(b"hello"), Keccak256.hash(b"hello"));
        assert_eq!(Blake3Hasher.hash(b"hello"), Blake3Hasher.hash(b"hello"));
    }

    #[test]
    fn blake3_matches_library() {
        let expected = Digest::from_hash(*blake3::hash(b"data").as_bytes());
        assert_eq!(Blake3Hasher.hash(b"data"), expected);
    }

    #[test]
    fn hashers_disagree() {
        assert_ne!(Blake3Hasher.hash(b"data"), Keccak256.hash(b"data"));
    }

    #[test]
    fn combine_is_order_independent() {
        let a = Keccak256.hash(b"a");
        let b = Keccak256.hash(b"b");
        assert_eq!(Keccak256.combine(&a, &b), Keccak256.combine(&b, &a));
    }

    #[test]
    fn combine_puts_smaller_digest_first() {
        let lo = Digest::from_hash([0x01; 32]);
        let hi = Digest::from_hash([0xf0; 32]);
        let mut concat = Vec::new();
        concat.extend_from_slice(lo.as_bytes());
        concat.extend_from_slice(hi.as_bytes());
        assert_eq!(Keccak256.combine(&hi, &lo), Keccak256.hash(&concat));
    }

    #[test]
    fn combine_of_equal_digests() {
        let d = Keccak256.hash(b"x");
        let mut concat = d.as_bytes().to_vec();
        concat.extend_from_slice(d.as_bytes());
        assert_eq!(Keccak256.combine(&d, &d), Keccak256.hash(&concat));
    }

    #[test]
    fn algorithm_dispatch_matches_concrete_hashers() {
        assert_eq!(HashAlgorithm::Keccak256.hash(b"z"), Keccak256.hash(b"z"));
        assert_eq!(HashAlgorithm::Blake3.hash(b"z"), Blake3Hasher.hash(b"z"));
    }

    #[test]
    fn algorithm_names_roundtrip() {
        for alg in HashAlgorithm::ALL {
            assert_eq!(alg.to_string().parse::<HashAlgorithm>().unwrap(), alg);
        }
        assert_eq!(
            "KECCAK".parse::<HashAlgorithm>().unwrap(),
            HashAlgorithm::Keccak256
        );
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let err = "sha1".parse::<HashAlgorithm>().unwrap_err();
        assert_eq!(err, MerkleError::UnknownHash("sha1".into()));
    }

    #[test]
    fn algorithm_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&HashAlgorithm::Blake3).unwrap();
        assert_eq!(json, "\"blake3\"");
    }
}

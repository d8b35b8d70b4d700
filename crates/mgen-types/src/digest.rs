use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Width of every digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Fixed-width output of a Merkle hasher.
///
/// Equality is byte-wise. Ordering is byte-wise lexicographic, which is the
/// same as comparing the digests as big-endian unsigned integers; sibling
/// pairs are sorted by this ordering before they are combined.
///
/// Displays and serializes as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Wrap a pre-computed hash.
    pub const fn from_hash(hash: [u8; DIGEST_LEN]) -> Self {
        Self(hash)
    }

    /// Copy a digest out of a slice that must be exactly [`DIGEST_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        let arr: [u8; DIGEST_LEN] = bytes.try_into().map_err(|_| TypeError::InvalidLength {
            expected: DIGEST_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Hex-encoded string without a prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Hex-encoded string with a `0x` prefix.
    pub fn to_prefixed_hex(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let stripped = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for [u8; DIGEST_LEN] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_prefixed_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn digest(seed: u8) -> Digest {
        Digest::from_hash([seed; DIGEST_LEN])
    }

    #[test]
    fn hex_roundtrip_with_and_without_prefix() {
        let d = digest(0xab);
        assert_eq!(Digest::from_hex(&d.to_hex()).unwrap(), d);
        assert_eq!(Digest::from_hex(&d.to_prefixed_hex()).unwrap(), d);
    }

    #[test]
    fn uppercase_hex_is_accepted() {
        let d = digest(0xab);
        let upper = format!("0X{}", d.to_hex().to_uppercase());
        assert_eq!(Digest::from_hex(&upper).unwrap(), d);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = Digest::from_hex("0xdeadbeef").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 4
            }
        );
    }

    #[test]
    fn non_hex_is_rejected() {
        let err = Digest::from_hex("0xzz").unwrap_err();
        assert!(matches!(err, TypeError::InvalidHex(_)));
    }

    #[test]
    fn from_slice_checks_length() {
        assert!(Digest::from_slice(&[0u8; 31]).is_err());
        assert_eq!(Digest::from_slice(&[7u8; 32]).unwrap(), digest(7));
    }

    #[test]
    fn display_is_prefixed_lowercase_hex() {
        let d = digest(0xcd);
        let shown = format!("{d}");
        assert_eq!(shown.len(), 66);
        assert!(shown.starts_with("0x"));
        assert_eq!(shown, shown.to_lowercase());
    }

    #[test]
    fn short_hex_is_8_chars() {
        assert_eq!(digest(1).short_hex(), "01010101");
    }

    #[test]
    fn serde_uses_prefixed_hex() {
        let d = digest(0x11);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, format!("\"{}\"", d.to_prefixed_hex()));
        let parsed: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, d);
    }

    #[test]
    fn serde_rejects_short_digest() {
        let result: Result<Digest, _> = serde_json::from_str("\"0x00\"");
        assert!(result.is_err());
    }

    #[test]
    fn ordering_is_big_endian() {
        let mut low = [0u8; DIGEST_LEN];
        low[DIGEST_LEN - 1] = 0xff;
        let mut high = [0u8; DIGEST_LEN];
        high[0] = 0x01;
        assert!(Digest::from_hash(low) < Digest::from_hash(high));
    }

    proptest! {
        #[test]
        fn ordering_matches_byte_comparison(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
            let (da, db) = (Digest::from_hash(a), Digest::from_hash(b));
            prop_assert_eq!(da.cmp(&db), a.as_slice().cmp(b.as_slice()));
        }
    }
}

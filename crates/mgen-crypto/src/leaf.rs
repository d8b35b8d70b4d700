//! Conversion of textual leaf values into the bytes that get hashed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a textual leaf value is turned into bytes before hashing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafEncoding {
    /// `0x`-prefixed hex strings are decoded, anything else is hashed as UTF-8.
    ///
    /// This matches how Ethereum tooling hashes address lists, where
    /// `"0xAbC…"` commits to the 20 address bytes rather than the string.
    #[default]
    Auto,
    /// Values must be `0x`-prefixed hex.
    Hex,
    /// Values are hashed as raw UTF-8 bytes.
    Utf8,
}

impl LeafEncoding {
    /// Encode one value, returning the reason on rejection.
    pub fn encode(&self, value: &str) -> Result<Vec<u8>, String> {
        match self {
            Self::Auto => {
                Ok(decode_prefixed_hex(value).unwrap_or_else(|| value.as_bytes().to_vec()))
            }
            Self::Hex => decode_prefixed_hex(value)
                .ok_or_else(|| format!("expected 0x-prefixed hex, got {value:?}")),
            Self::Utf8 => Ok(value.as_bytes().to_vec()),
        }
    }
}

/// Decode `^0x[0-9a-fA-F]*$`, left-padding odd digit counts with one `0`.
fn decode_prefixed_hex(value: &str) -> Option<Vec<u8>> {
    let digits = value.strip_prefix("0x")?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let decoded = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    };
    decoded.ok()
}

impl fmt::Display for LeafEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Hex => "hex",
            Self::Utf8 => "utf8",
        };
        f.write_str(name)
    }
}

impl FromStr for LeafEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "hex" => Ok(Self::Hex),
            "utf8" | "utf-8" => Ok(Self::Utf8),
            other => Err(format!("unknown leaf encoding: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x82eCCdC1C959dFe1C9e51334C043B9c289bC6cFb";

    #[test]
    fn auto_decodes_addresses() {
        let bytes = LeafEncoding::Auto.encode(ADDRESS).unwrap();
        assert_eq!(bytes.len(), 20);
        assert_eq!(bytes[0], 0x82);
        assert_eq!(bytes[19], 0xfb);
    }

    #[test]
    fn auto_falls_back_to_utf8() {
        assert_eq!(LeafEncoding::Auto.encode("alice").unwrap(), b"alice");
        // Uppercase prefix and non-hex digits are not treated as hex.
        assert_eq!(LeafEncoding::Auto.encode("0Xab").unwrap(), b"0Xab");
        assert_eq!(LeafEncoding::Auto.encode("0xzz").unwrap(), b"0xzz");
    }

    #[test]
    fn odd_length_hex_is_left_padded() {
        assert_eq!(LeafEncoding::Hex.encode("0xabc").unwrap(), vec![0x0a, 0xbc]);
    }

    #[test]
    fn bare_prefix_is_empty() {
        assert!(LeafEncoding::Hex.encode("0x").unwrap().is_empty());
    }

    #[test]
    fn strict_hex_rejects_text() {
        let reason = LeafEncoding::Hex.encode("alice").unwrap_err();
        assert!(reason.contains("alice"));
    }

    #[test]
    fn utf8_never_decodes() {
        assert_eq!(
            LeafEncoding::Utf8.encode(ADDRESS).unwrap(),
            ADDRESS.as_bytes()
        );
    }

    #[test]
    fn names_roundtrip() {
        for enc in [LeafEncoding::Auto, LeafEncoding::Hex, LeafEncoding::Utf8] {
            assert_eq!(enc.to_string().parse::<LeafEncoding>().unwrap(), enc);
        }
        assert!("base64".parse::<LeafEncoding>().is_err());
    }
}

//! Foundation types for merkle-gen.
//!
//! Every other merkle-gen crate depends on `mgen-types` for the [`Digest`]
//! type, the 32-byte output of a Merkle hasher, and its hex rendering.

pub mod digest;
pub mod error;

pub use digest::{Digest, DIGEST_LEN};
pub use error::TypeError;

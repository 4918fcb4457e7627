//! crates/wa_io/src/hasher.rs
//!
//! SHA-256 digests over canonical JSON, used to fingerprint the declaration
//! that produced a report. Hex digests are **lowercase**.

use serde::Serialize;
use sha2::{Digest, Sha256 as Sha256Hasher};
use wa_core::ids::Sha256;

use crate::canonical_json::to_canonical_bytes;
use crate::{IoError, IoResult};

/// SHA-256 over raw bytes, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256Hasher::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 over the **canonical JSON bytes** of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> IoResult<Sha256> {
    let bytes = to_canonical_bytes(value)?;
    sha256_hex(&bytes)
        .parse()
        .map_err(|e| IoError::Invalid(format!("digest shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn canonical_digest_ignores_key_order() {
        let a = sha256_canonical(&json!({"x": 1, "y": [1, 2]})).unwrap();
        let b = sha256_canonical(&json!({"y": [1, 2], "x": 1})).unwrap();
        assert_eq!(a, b);
        let c = sha256_canonical(&json!({"y": [2, 1], "x": 1})).unwrap();
        assert_ne!(a, c);
    }
}

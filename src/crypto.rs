//! Narrow cryptographic interface the signer calls through, matching the
//! external crypto contract: `sha256(bytes) -> [32]u8`,
//! `hmac_sha256(key, msg) -> [32]u8`. Kept as a trait (rather than calling
//! `sha2`/`hmac` directly from the signer) so an embedding host can supply
//! hardware-accelerated or FIPS-validated implementations.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

/// Implemented by anything that can provide SHA-256 and HMAC-SHA-256.
pub trait Signer: Send + Sync {
    fn sha256(&self, bytes: &[u8]) -> [u8; 32];
    fn hmac_sha256(&self, key: &[u8], msg: &[u8]) -> [u8; 32];
}

/// The `sha2`/`hmac` crate-backed implementation used unless an embedding
/// host supplies its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSigner;

impl Signer for DefaultSigner {
    fn sha256(&self, bytes: &[u8]) -> [u8; 32] {
        Sha256::digest(bytes).into()
    }

    fn hmac_sha256(&self, key: &[u8], msg: &[u8]) -> [u8; 32] {
        // A key of any length is a valid HMAC key; this can only fail for
        // an implementation bug, not for caller input.
        let mut mac =
            Hmac::<Sha256>::new_from_slice(key).expect("HMAC can take key of any size");
        mac.update(msg);
        mac.finalize().into_bytes().into()
    }
}

pub fn hex_sha256(signer: &dyn Signer, bytes: &[u8]) -> String {
    hex::encode(signer.sha256(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_string_matches_known_constant() {
        let signer = DefaultSigner;
        assert_eq!(
            hex_sha256(&signer, b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}

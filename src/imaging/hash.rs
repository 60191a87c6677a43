use sha2::{Digest, Sha256};

/// Computes the content fingerprint of a canonical image payload
///
/// The fingerprint is the hex-encoded SHA-256 digest of the bytes, so it
/// depends only on content: two URLs serving byte-identical images after
/// normalization collapse to the same fingerprint.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

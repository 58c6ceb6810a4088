use std::fmt::Write;

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a document's bytes. Two uploads with the same
/// fingerprint are the same statement, whatever their file names.
pub fn fingerprint(data: &[u8]) -> String {
    Sha256::digest(data)
        .iter()
        .fold(String::with_capacity(64), |mut hex, byte| {
            let _ = write!(hex, "{byte:02x}");
            hex
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_digest() {
        assert_eq!(
            fingerprint(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn fingerprint_depends_on_content_only() {
        assert_eq!(fingerprint(b"extrato"), fingerprint(b"extrato"));
        assert_ne!(fingerprint(b"extrato"), fingerprint(b"extrato "));
        assert_eq!(fingerprint(b"x").len(), 64);
    }
}

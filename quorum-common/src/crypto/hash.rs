use sha2::{Sha256, Digest};

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Computes the SHA-256 digest of the given data and returns it as a lowercase hex string.
///
/// This is the content hash used to key message tallies: identical payloads
/// always map to the same digest, whichever peer delivered them.
pub fn digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Checks whether `hash` is the digest of `data`.
pub fn matches(hash: &str, data: &[u8]) -> bool {
    hash.len() == DIGEST_HEX_LEN && hash.eq_ignore_ascii_case(&digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest() {
        let data = b"hello world";
        let hash = digest(data);
        assert_eq!(hash, "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9");
    }

    #[test]
    fn test_digest_of_empty_payload() {
        assert_eq!(
            digest(&[]),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_is_deterministic() {
        let data = vec![0x01, 0x02, 0x03];
        assert_eq!(digest(&data), digest(&data.clone()));
        assert_ne!(digest(&data), digest(&[0x01, 0x02]));
        assert_eq!(digest(&data).len(), DIGEST_HEX_LEN);
    }

    #[test]
    fn test_matches() {
        let data = b"vote";
        let hash = digest(data);
        assert!(matches(&hash, data));
        assert!(matches(&hash.to_uppercase(), data));
        assert!(!matches(&hash, b"other"));
        assert!(!matches("abc", data));
    }
}

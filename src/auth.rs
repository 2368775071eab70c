use sha2::{Digest, Sha256};

/// Hash the admin passkey for storage/compare (SHA-256 hex).
/// The plaintext passkey never lives in `AppState`.
pub fn hash_passkey(passkey: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(passkey.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_passkey(presented: &str, stored_hash: &str) -> bool {
    hash_passkey(presented.trim()) == stored_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_matching_passkey() {
        let stored = hash_passkey("111111");
        assert!(verify_passkey("111111", &stored));
        assert!(verify_passkey(" 111111 ", &stored));
        assert!(!verify_passkey("222222", &stored));
    }
}

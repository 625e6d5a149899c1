use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of the password's UTF-8 bytes.
///
/// Unsalted and single-round: equal passwords always produce equal digests,
/// which is what lets login compare hashes directly in SQL. Not suitable for
/// anything beyond the demo app.
pub fn hash_password(plain: &str) -> String {
    hex::encode(Sha256::digest(plain.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic_lowercase_hex() {
        let first = hash_password("12345678");
        let second = hash_password("12345678");
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn hash_matches_known_digest() {
        assert_eq!(
            hash_password("12345678"),
            "ef797c8118f02dfb649607dd5d3f8c7623048c9c063d532cc95c5ed7a898a64f"
        );
        assert_eq!(
            hash_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn different_passwords_hash_differently() {
        assert_ne!(
            hash_password("correct-horse-battery-staple"),
            hash_password("wrong-password")
        );
        assert_ne!(hash_password("12345678"), hash_password("12345679"));
    }

    #[test]
    fn hash_covers_multibyte_input() {
        assert_ne!(hash_password("密码12345678"), hash_password("12345678"));
    }
}

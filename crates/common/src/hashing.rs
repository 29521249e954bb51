//! Salted phone-number hashing.
//!
//! Phone numbers are never stored in plaintext. The storage and lookup key
//! for a report is the SHA-256 digest of the normalized number concatenated
//! with a server-held secret salt. The digest is deterministic, so lookups
//! keep working, and non-reversible, so a database leak does not expose the
//! numbers themselves.

use sha2::{Digest, Sha256};

/// Derives lookup keys from normalized phone numbers.
#[derive(Debug, Clone)]
pub struct PhoneHasher {
    salt: String,
}

impl PhoneHasher {
    /// Create a hasher with the process-wide secret salt.
    #[must_use]
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// Hash a normalized phone number into a 64-character hex key.
    ///
    /// Same input always yields the same output for a given salt.
    #[must_use]
    pub fn hash(&self, normalized_phone: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(normalized_phone.as_bytes());
        hasher.update(self.salt.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic() {
        let hasher = PhoneHasher::new("salt");
        assert_eq!(hasher.hash("0550123456"), hasher.hash("0550123456"));
    }

    #[test]
    fn output_is_fixed_length_hex() {
        let hasher = PhoneHasher::new("salt");
        let key = hasher.hash("0550123456");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_phones_do_not_collide() {
        let hasher = PhoneHasher::new("salt");
        assert_ne!(hasher.hash("0550123456"), hasher.hash("0550123457"));
    }

    #[test]
    fn salt_changes_the_key() {
        let a = PhoneHasher::new("salt-a").hash("0550123456");
        let b = PhoneHasher::new("salt-b").hash("0550123456");
        assert_ne!(a, b);
    }
}

//! The 32-byte salt seeded into an outgoing (or pay-for-relay) message PDA.
//! An idempotency key deterministically seeds the salt so retries with the
//! same key land on the same PDA; otherwise a fresh salt is drawn.

use alloy_primitives::keccak256;
use rand::RngCore;

pub fn salt_for_idempotency_key(key: &str) -> [u8; 32] {
    keccak256(key.as_bytes()).0
}

pub fn fresh_salt() -> [u8; 32] {
    let mut salt = [0u8; 32];
    rand::rng().fill_bytes(&mut salt);
    salt
}

/// Resolves the salt for an initiating operation: the idempotency key's
/// hash when supplied, otherwise a freshly drawn value.
pub fn resolve_salt(idempotency_key: Option<&str>) -> [u8; 32] {
    match idempotency_key {
        Some(key) => salt_for_idempotency_key(key),
        None => fresh_salt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_idempotency_key_yields_same_salt() {
        let a = salt_for_idempotency_key("retry-me");
        let b = salt_for_idempotency_key("retry-me");
        assert_eq!(a, b);
    }

    #[test]
    fn different_idempotency_keys_yield_different_salts() {
        let a = salt_for_idempotency_key("one");
        let b = salt_for_idempotency_key("two");
        assert_ne!(a, b);
    }

    #[test]
    fn fresh_salts_are_not_trivially_equal() {
        let a = fresh_salt();
        let b = fresh_salt();
        assert_ne!(a, b);
    }
}

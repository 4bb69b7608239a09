//! Deterministic wrapped-token mint derivation: `(decimals,
//! keccak(metadata blob))`. The metadata blob packs the remote token
//! address, display name, symbol, and the scaler exponent with explicit
//! length prefixes so the same inputs always serialize identically.

use alloy_primitives::{B256, keccak256};

/// Builds the length-prefixed metadata blob for a wrapped token, SVM-side
/// little-endian `u32` length prefixes ahead of each variable-length
/// field, matching the on-chain program's deserialization.
pub fn wrapped_token_metadata_blob(
    remote_token: &[u8; 20],
    name: &str,
    symbol: &str,
    decimals: u8,
    scaler_exponent: i8,
) -> Vec<u8> {
    let mut blob = Vec::with_capacity(64 + name.len() + symbol.len());
    blob.extend_from_slice(remote_token);
    blob.push(decimals);
    blob.push(scaler_exponent as u8);

    let name_bytes = name.as_bytes();
    blob.extend_from_slice(&(name_bytes.len() as u32).to_le_bytes());
    blob.extend_from_slice(name_bytes);

    let symbol_bytes = symbol.as_bytes();
    blob.extend_from_slice(&(symbol_bytes.len() as u32).to_le_bytes());
    blob.extend_from_slice(symbol_bytes);

    blob
}

/// The deterministic identity seeded into the wrapped-token mint PDA:
/// `keccak256(metadata blob)`.
pub fn wrapped_token_id(
    remote_token: &[u8; 20],
    name: &str,
    symbol: &str,
    decimals: u8,
    scaler_exponent: i8,
) -> B256 {
    keccak256(wrapped_token_metadata_blob(
        remote_token,
        name,
        symbol,
        decimals,
        scaler_exponent,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_token_id_is_deterministic() {
        let remote = [0xabu8; 20];
        let a = wrapped_token_id(&remote, "Wrapped Ether", "WETH", 18, 0);
        let b = wrapped_token_id(&remote, "Wrapped Ether", "WETH", 18, 0);
        assert_eq!(a, b);
    }

    #[test]
    fn different_names_yield_different_ids() {
        let remote = [0xabu8; 20];
        let a = wrapped_token_id(&remote, "Wrapped Ether", "WETH", 18, 0);
        let b = wrapped_token_id(&remote, "Wrapped Bitcoin", "WBTC", 8, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn length_prefixes_prevent_field_boundary_collisions() {
        // "ab" + "c" must not hash the same as "a" + "bc".
        let remote = [1u8; 20];
        let a = wrapped_token_metadata_blob(&remote, "ab", "c", 0, 0);
        let b = wrapped_token_metadata_blob(&remote, "a", "bc", 0, 0);
        assert_ne!(a, b);
    }
}

//! Address/hash string <-> byte conversions shared by both route adapters.
//! Chain-native string encodings (EVM hex, SVM base58) cross the
//! `BridgeRequest`/`MessageRef` boundary as plain strings; these helpers are
//! the one place that turns them into the byte shapes the engines expect.

use alloy_primitives::Address;
use bridge_engine_evm::EvmEngineError;
use bridge_engine_svm::SvmEngineError;
use bridge_types::{BridgeError, BridgeRoute, ErrorStage};
use solana_pubkey::Pubkey;
use std::str::FromStr;

fn unsupported(reason: impl Into<String>, route: &BridgeRoute) -> BridgeError {
    BridgeError::UnsupportedAction {
        reason: reason.into(),
        route: Some(route.clone()),
    }
}

/// Parses a `0x`-prefixed (or bare) hex EVM address.
pub fn parse_evm_address(raw: &str, route: &BridgeRoute) -> Result<Address, BridgeError> {
    Address::from_str(raw.trim()).map_err(|e| unsupported(format!("invalid EVM address `{raw}`: {e}"), route))
}

/// Parses a base58-encoded SVM pubkey.
pub fn parse_svm_pubkey(raw: &str, route: &BridgeRoute) -> Result<Pubkey, BridgeError> {
    Pubkey::from_str(raw.trim()).map_err(|e| unsupported(format!("invalid SVM pubkey `{raw}`: {e}"), route))
}

/// Parses a `0x`-prefixed 32-byte hex value (message hashes, outer hashes).
pub fn parse_hex32(raw: &str, route: &BridgeRoute) -> Result<[u8; 32], BridgeError> {
    let trimmed = raw.trim().trim_start_matches("0x");
    let bytes = hex::decode(trimmed).map_err(|e| unsupported(format!("invalid hex value `{raw}`: {e}"), route))?;
    if bytes.len() != 32 {
        return Err(unsupported(
            format!("expected 32 bytes, got {} in `{raw}`", bytes.len()),
            route,
        ));
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

pub fn hex0x(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Right-pads an EVM address into the 32-byte SVM-side `to` field shape the
/// chain programs expect (first 20 bytes significant, trailing zero).
pub fn evm_address_to_svm_to(address: Address) -> [u8; 32] {
    bridge_codec::right_pad_to_32(address).0
}

pub fn invariant(reason: impl Into<String>, stage: ErrorStage) -> BridgeError {
    BridgeError::InvariantViolation {
        reason: reason.into(),
        stage,
    }
}

/// Maps the SVM engine's typed errors onto the bridge taxonomy. Most
/// variants are generic RPC/decode failures; `NotProven`/`AlreadyExecuted`
/// carry through as their dedicated, idempotency-relevant variants rather
/// than flattening to `RpcError`.
pub fn from_svm_err(err: SvmEngineError, route: &BridgeRoute, stage: ErrorStage) -> BridgeError {
    match err {
        SvmEngineError::NotProven(_) => BridgeError::NotProven {
            route: Some(route.clone()),
        },
        SvmEngineError::AlreadyExecuted(_) => BridgeError::AlreadyExecuted {
            route: Some(route.clone()),
        },
        other => BridgeError::RpcError {
            reason: other.to_string(),
            chain: Some(route.source_chain.clone()),
            stage,
        },
    }
}

/// Maps the EVM engine's typed errors onto the bridge taxonomy.
pub fn from_evm_err(err: EvmEngineError, route: &BridgeRoute, stage: ErrorStage) -> BridgeError {
    match err {
        EvmEngineError::ProofNotAvailable { reason, .. } => BridgeError::ProofNotAvailable { reason },
        EvmEngineError::NotFinal { recorded, log_block } => BridgeError::NotFinal {
            chain: Some(route.destination_chain.clone()),
            recorded_block: recorded,
            log_block,
        },
        EvmEngineError::MessageFailed(_) => BridgeError::MessageFailed {
            route: Some(route.clone()),
        },
        EvmEngineError::InvariantViolation(reason) => BridgeError::InvariantViolation { reason, stage },
        EvmEngineError::ApprovalTimeout(_, timeout) | EvmEngineError::MonitorTimeout(_, timeout) => {
            BridgeError::Timeout {
                reason: format!("{timeout:?} elapsed without reaching the expected destination state"),
                stage,
            }
        }
        other => BridgeError::RpcError {
            reason: other.to_string(),
            chain: Some(route.destination_chain.clone()),
            stage,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> BridgeRoute {
        BridgeRoute::new(
            bridge_types::ChainId::new("solana", "mainnet"),
            bridge_types::ChainId::new("eip155", "8453"),
        )
    }

    #[test]
    fn parses_valid_evm_address() {
        let addr = parse_evm_address("0x0000000000000000000000000000000000000001", &route()).unwrap();
        let mut expected = [0u8; 20];
        expected[19] = 1;
        assert_eq!(addr, Address::from(expected));
    }

    #[test]
    fn rejects_malformed_hex32() {
        assert!(parse_hex32("not-hex", &route()).is_err());
        assert!(parse_hex32("0x1234", &route()).is_err());
    }

    #[test]
    fn right_pads_evm_address_into_32_bytes() {
        let addr = Address::from_slice(&[0x11; 20]);
        let padded = evm_address_to_svm_to(addr);
        assert_eq!(&padded[..20], &[0x11; 20]);
        assert_eq!(&padded[20..], &[0u8; 12]);
    }
}

//! Deterministic encoding of the three outgoing-message payload shapes into
//! the `(ty, data)` pair the destination-side EVM bridge contract expects,
//! using the EVM ABI tuple layout.

use alloy_primitives::{Address, B256, Bytes};
use alloy_sol_types::{SolValue, sol};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct CallTuple {
        uint8 callType;
        address to;
        uint128 value;
        bytes data;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct TransferTuple {
        address localToken;
        bytes32 remoteToken;
        bytes32 to;
        uint64 remoteAmount;
    }
}

/// Takes the first 20 bytes of a 32-byte SVM-side value and interprets
/// them as an EVM address. This is the byte layout the bridge contract
/// expects; see the Open Question in the design notes about the
/// `transferTuple.localToken = firstBytes20(transfer.remoteToken)`
/// asymmetry — preserved here exactly as observed, not "fixed".
pub fn first_bytes20(raw: &[u8; 32]) -> Address {
    Address::from_slice(&raw[..20])
}

/// Right-pads a 20-byte EVM address to 32 bytes, so that on-chain
/// `bytes20(to)` recovers the original address.
pub fn right_pad_to_32(address: Address) -> B256 {
    let mut out = [0u8; 32];
    out[..20].copy_from_slice(address.as_slice());
    B256::from(out)
}

/// Left-pads a value shorter than 32 bytes. Defensive: in practice an
/// SVM pubkey is always exactly 32 bytes.
pub fn left_pad_to_32(raw: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    if raw.len() >= 32 {
        out.copy_from_slice(&raw[raw.len() - 32..]);
    } else {
        out[32 - raw.len()..].copy_from_slice(raw);
    }
    out
}

/// `ty` discriminants understood by the destination bridge contract.
pub const TY_CALL: u8 = 0;
pub const TY_TRANSFER: u8 = 1;
pub const TY_TRANSFER_WITH_CALL: u8 = 2;

/// Inputs needed to encode a bare `Call` payload. `to` is the raw 32-byte
/// SVM-side destination field; only its first 20 bytes are significant.
pub struct CallPayload {
    pub call_type: u8,
    pub to: [u8; 32],
    pub value: u128,
    pub data: Vec<u8>,
}

/// Inputs needed to encode a `Transfer` payload (with or without a nested
/// call). Field names mirror the SVM-side account layout, not the EVM-side
/// tuple, so the mapping in `encode` stays visible at the call site.
pub struct TransferPayload {
    /// SVM's `remoteToken` field: the EVM token address, stored as 32
    /// bytes with only the first 20 significant.
    pub svm_remote_token: [u8; 32],
    /// SVM's `localToken` field: the SVM mint, carried through as the
    /// EVM tuple's 32-byte `remoteToken`.
    pub svm_local_token: [u8; 32],
    /// The destination EVM recipient address.
    pub to: Address,
    pub remote_amount: u64,
    pub nested_call: Option<CallPayload>,
}

fn call_tuple(call: &CallPayload) -> CallTuple {
    CallTuple {
        callType: call.call_type,
        to: first_bytes20(&call.to),
        value: call.value,
        data: Bytes::from(call.data.clone()),
    }
}

fn transfer_tuple(transfer: &TransferPayload) -> TransferTuple {
    TransferTuple {
        localToken: first_bytes20(&transfer.svm_remote_token),
        remoteToken: B256::from(transfer.svm_local_token),
        to: right_pad_to_32(transfer.to),
        remoteAmount: transfer.remote_amount,
    }
}

/// Encodes a [`CallPayload`] into `(ty = 0, data)`.
pub fn encode_call(call: &CallPayload) -> (u8, Vec<u8>) {
    (TY_CALL, call_tuple(call).abi_encode())
}

/// Encodes a [`TransferPayload`] into `(ty, data)`: `ty = 1` when there is
/// no nested call, `ty = 2` (tuple-of-tuples) when there is.
pub fn encode_transfer(transfer: &TransferPayload) -> (u8, Vec<u8>) {
    match &transfer.nested_call {
        None => (TY_TRANSFER, transfer_tuple(transfer).abi_encode()),
        Some(call) => {
            let encoded = (transfer_tuple(transfer), call_tuple(call)).abi_encode();
            (TY_TRANSFER_WITH_CALL, encoded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_payload_uses_first_20_bytes_of_to() {
        let mut to = [0u8; 32];
        to[..20].copy_from_slice(&[0x11; 20]);
        to[20..].copy_from_slice(&[0xff; 12]); // trailing garbage must be ignored

        let call = CallPayload {
            call_type: 0,
            to,
            value: 0,
            data: hex::decode("d09de08a").unwrap(),
        };
        let (ty, data) = encode_call(&call);
        assert_eq!(ty, TY_CALL);
        assert!(!data.is_empty());

        let decoded = CallTuple::abi_decode(&data).unwrap();
        assert_eq!(decoded.to, Address::from_slice(&[0x11; 20]));
    }

    #[test]
    fn transfer_payload_right_pads_destination() {
        let transfer = TransferPayload {
            svm_remote_token: [0x22; 32],
            svm_local_token: [0x33; 32],
            to: Address::from_slice(&[0x44; 20]),
            remote_amount: 1_000_000,
            nested_call: None,
        };
        let (ty, data) = encode_transfer(&transfer);
        assert_eq!(ty, TY_TRANSFER);

        let decoded = TransferTuple::abi_decode(&data).unwrap();
        assert_eq!(decoded.localToken, Address::from_slice(&[0x22; 20]));
        assert_eq!(decoded.remoteToken, B256::from([0x33; 32]));
        let mut expected_to = [0u8; 32];
        expected_to[..20].copy_from_slice(&[0x44; 20]);
        assert_eq!(decoded.to, B256::from(expected_to));
    }

    #[test]
    fn transfer_with_nested_call_uses_ty_2() {
        let transfer = TransferPayload {
            svm_remote_token: [0x22; 32],
            svm_local_token: [0x33; 32],
            to: Address::from_slice(&[0x44; 20]),
            remote_amount: 1,
            nested_call: Some(CallPayload {
                call_type: 1,
                to: [0x55; 32],
                value: 0,
                data: vec![],
            }),
        };
        let (ty, _data) = encode_transfer(&transfer);
        assert_eq!(ty, TY_TRANSFER_WITH_CALL);
    }

    #[test]
    fn left_pad_is_identity_for_full_length_input() {
        let raw = [7u8; 32];
        assert_eq!(left_pad_to_32(&raw), raw);
    }

    #[test]
    fn left_pad_pads_short_input() {
        let raw = [9u8; 4];
        let padded = left_pad_to_32(&raw);
        assert_eq!(&padded[..28], &[0u8; 28]);
        assert_eq!(&padded[28..], &raw);
    }
}

//! The canonical inner/outer hash derivation that links a source-side
//! (SVM) outgoing message to its destination-side (EVM) identifier.
//!
//! `outerHash` is a pure function of `(nonce, outgoingMessagePubkey,
//! sender, encoded payload)`: two builds of the same message yield the
//! same outer hash, regardless of when or how many times it is computed.

use alloy_primitives::{B256, keccak256};
use alloy_sol_types::{SolValue, sol};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct InnerHashPreimage {
        bytes32 sender;
        uint8 ty;
        bytes data;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct OuterHashPreimage {
        uint64 nonce;
        bytes32 outgoingMessagePubkey;
        bytes32 innerHash;
    }

    /// The tuple the destination bridge contract's `relayMessages` and
    /// `getMessageHash` operate on.
    #[derive(Debug, PartialEq, Eq)]
    struct IncomingMessage {
        uint64 nonce;
        bytes32 sender;
        uint8 ty;
        bytes data;
        bytes32 outgoingMessagePubkey;
        uint64 gasLimit;
    }
}

/// A decoded SVM "outgoing message" account: enough to derive its outer
/// hash. `ty`/`data` come from [`crate::payload`]'s encoders.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub nonce: u64,
    pub sender: [u8; 32],
    pub ty: u8,
    pub data: Vec<u8>,
    pub outgoing_message_pubkey: [u8; 32],
    pub gas_limit: u64,
}

/// `innerHash = keccak256(abi_encode(bytes32 sender, uint8 ty, bytes data))`.
pub fn inner_hash(sender: [u8; 32], ty: u8, data: &[u8]) -> B256 {
    let preimage = InnerHashPreimage {
        sender: B256::from(sender),
        ty,
        data: data.to_vec().into(),
    };
    keccak256(preimage.abi_encode())
}

/// `outerHash = keccak256(abi_encode(uint64 nonce, bytes32
/// outgoingMessagePubkey, bytes32 innerHash))`.
pub fn outer_hash(nonce: u64, outgoing_message_pubkey: [u8; 32], inner_hash: B256) -> B256 {
    let preimage = OuterHashPreimage {
        nonce,
        outgoingMessagePubkey: B256::from(outgoing_message_pubkey),
        innerHash: inner_hash,
    };
    keccak256(preimage.abi_encode())
}

/// Computes the outer hash for a fully-decoded outgoing message in one
/// call, composing [`inner_hash`] and [`outer_hash`].
pub fn compute_outer_hash(message: &OutgoingMessage) -> B256 {
    let inner = inner_hash(message.sender, message.ty, &message.data);
    outer_hash(message.nonce, message.outgoing_message_pubkey, inner)
}

impl IncomingMessage {
    pub fn from_outgoing(message: &OutgoingMessage) -> Self {
        IncomingMessage {
            nonce: message.nonce,
            sender: B256::from(message.sender),
            ty: message.ty,
            data: message.data.clone().into(),
            outgoingMessagePubkey: B256::from(message.outgoing_message_pubkey),
            gasLimit: message.gas_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_hash_is_pure_function_of_its_inputs() {
        let message = OutgoingMessage {
            nonce: 42,
            sender: [0u8; 32], // system program id
            ty: 0,
            data: hex::decode("d09de08a").unwrap(),
            outgoing_message_pubkey: [0x77; 32],
            gas_limit: 123_456,
        };
        let first = compute_outer_hash(&message);
        let second = compute_outer_hash(&message.clone());
        assert_eq!(first, second);

        // Pinned regression value for this exact input set, so a latent
        // encoding-order or field-swap bug in inner_hash/outer_hash fails
        // this test even though it would still be a pure function of its
        // inputs.
        assert_eq!(
            hex::encode(first.as_slice()),
            "3c9257d69cf0ddd89748bab6127c83bde94b1c607b12e33f0610da12341461e6"
        );
    }

    #[test]
    fn different_nonce_yields_different_outer_hash() {
        let base = OutgoingMessage {
            nonce: 1,
            sender: [1u8; 32],
            ty: 1,
            data: vec![1, 2, 3],
            outgoing_message_pubkey: [2u8; 32],
            gas_limit: 100,
        };
        let mut other = base.clone();
        other.nonce = 2;
        assert_ne!(compute_outer_hash(&base), compute_outer_hash(&other));
    }

    #[test]
    fn gas_limit_does_not_change_outer_hash_but_changes_incoming_message() {
        let mut message = OutgoingMessage {
            nonce: 42,
            sender: [9u8; 32],
            ty: 1,
            data: vec![4, 5, 6],
            outgoing_message_pubkey: [3u8; 32],
            gas_limit: 1,
        };
        let hash_a = compute_outer_hash(&message);
        message.gas_limit = 2;
        let hash_b = compute_outer_hash(&message);
        // gasLimit is not part of the outer hash preimage.
        assert_eq!(hash_a, hash_b);
    }

    #[test]
    fn incoming_message_round_trips_fields_from_outgoing() {
        let message = OutgoingMessage {
            nonce: 7,
            sender: [5u8; 32],
            ty: 2,
            data: vec![9, 9],
            outgoing_message_pubkey: [6u8; 32],
            gas_limit: 200,
        };
        let incoming = IncomingMessage::from_outgoing(&message);
        assert_eq!(incoming.nonce, 7);
        assert_eq!(incoming.sender, B256::from([5u8; 32]));
        assert_eq!(incoming.gasLimit, 200);
    }
}

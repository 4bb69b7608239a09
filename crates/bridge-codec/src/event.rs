//! The decoded shape of the EVM bridge contract's `MessageInitiated` log,
//! shared by the EVM engine (which decodes it from a receipt), the SVM
//! engine (which consumes it to prove an incoming message), and the
//! EVM→SVM route adapter (which threads it between `initiate` and
//! `prove`).

use alloy_sol_types::sol;

sol! {
    /// `event MessageInitiated(bytes32 messageHash, bytes32 mmrRoot, Message message)`
    #[derive(Debug, PartialEq, Eq)]
    struct Message {
        uint64 nonce;
        bytes32 sender;
        uint8 ty;
        bytes data;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageInitiatedEvent {
    pub message_hash: [u8; 32],
    pub mmr_root: [u8; 32],
    pub nonce: u64,
    /// The event's 32-byte `sender` field: an EVM address left-padded to
    /// 32 bytes, or an SVM pubkey verbatim (already 32 bytes).
    pub sender: [u8; 32],
    pub ty: u8,
    pub data: Vec<u8>,
}

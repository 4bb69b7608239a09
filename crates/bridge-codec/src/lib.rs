//! Canonical message identity derivation, ABI payload encoding, and the
//! static PDA seed table shared with the on-chain programs.

pub mod event;
pub mod hash;
pub mod payload;
pub mod seeds;
pub mod wrapped_token;

pub use event::MessageInitiatedEvent;
pub use hash::{IncomingMessage, OutgoingMessage, compute_outer_hash, inner_hash, outer_hash};
pub use payload::{
    CallPayload, TransferPayload, encode_call, encode_transfer, first_bytes20, left_pad_to_32,
    right_pad_to_32,
};
pub use wrapped_token::{wrapped_token_id, wrapped_token_metadata_blob};

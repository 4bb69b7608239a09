//! The EVM source engine: EVM-originated bridge sends (fungible-token,
//! arbitrary call), proof generation for EVM→SVM messages, and
//! destination-side execution/monitoring for SVM→EVM messages.

pub mod contract;
pub mod engine;
pub mod error;

pub use contract::{IBridge, IBridgeValidator, IncomingMessage, Ix, Message, Transfer};
pub use engine::{
    ApprovalOptions, CallInput, EvmEngine, EvmEngineConfig, ExecuteOutcome, MonitorOptions,
    decode_message_initiated,
};
pub use error::EvmEngineError;

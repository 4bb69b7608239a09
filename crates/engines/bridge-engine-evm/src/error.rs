use alloy_primitives::B256;
use bridge_chain_evm::EvmChainProviderError;

#[derive(Debug, thiserror::Error)]
pub enum EvmEngineError {
    #[error(transparent)]
    Chain(#[from] EvmChainProviderError),

    #[error("transaction {0} has no receipt yet")]
    ReceiptNotFound(B256),

    #[error("no usable MessageInitiated event found in receipt for {tx_hash}: {reason}")]
    ProofNotAvailable { tx_hash: B256, reason: String },

    #[error(
        "destination-side recorded hub block number {recorded} is behind the initiation log's block {log_block}"
    )]
    NotFinal { recorded: u64, log_block: u64 },

    #[error("destination recorded a permanent failure for outer hash {0}")]
    MessageFailed(B256),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("timed out waiting for relayer approval of outer hash {0} after {1:?}")]
    ApprovalTimeout(B256, std::time::Duration),

    #[error("timed out waiting for execution of outer hash {0} after {1:?}")]
    MonitorTimeout(B256, std::time::Duration),
}

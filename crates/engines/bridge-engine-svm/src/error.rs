use bridge_chain_svm::SvmChainProviderError;
use solana_pubkey::Pubkey;

#[derive(Debug, thiserror::Error)]
pub enum SvmEngineError {
    #[error(transparent)]
    Chain(#[from] SvmChainProviderError),

    #[error("failed to decode base58 value: {0}")]
    Base58(String),

    #[error("incoming message account {0} not found")]
    IncomingMessageNotFound(Pubkey),

    #[error("outgoing message account {0} not found")]
    OutgoingMessageNotFound(Pubkey),

    #[error("incoming message account {0} is malformed: {1}")]
    MalformedAccount(Pubkey, String),

    #[error("execute was attempted before prove: no incoming message account for hash {0}")]
    NotProven(String),

    #[error("execute was redundant: message {0} was already executed")]
    AlreadyExecuted(String),

    #[error("bridge state account not found at {0}")]
    BridgeStateNotFound(Pubkey),
}

use alloy_primitives::B256;
use bridge_types::ChainId;

#[derive(Debug, thiserror::Error)]
pub enum EvmChainProviderError {
    #[error("invalid chain reference `{0}`: not a valid eip155 chain id")]
    InvalidChainReference(String),
    #[error("no RPC endpoints configured for chain {0}")]
    NoRpcEndpoints(ChainId),
    #[error("failed constructing RPC transport: {0}")]
    Transport(String),
    #[error("invalid signer: {0}")]
    InvalidSigner(String),
    #[error("this adapter has no configured signer (read-only wallet mode)")]
    NoSigner,
    #[error("RPC call failed: {0}")]
    Rpc(String),
    #[error("transaction {0} was not confirmed within {1:?}")]
    ReceiptTimeout(B256, std::time::Duration),
    #[error("multicall sub-call failed: {0}")]
    MulticallFailure(String),
}

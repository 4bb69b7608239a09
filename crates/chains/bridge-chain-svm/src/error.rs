use bridge_types::ChainId;
use solana_pubkey::Pubkey;

#[derive(Debug, thiserror::Error)]
pub enum SvmChainProviderError {
    #[error("invalid keypair material: {0}")]
    InvalidKeypair(String),
    #[error("could not read keypair file {path}: {reason}")]
    KeypairFile { path: String, reason: String },
    #[error("no signer positioned for pubkey {0} among the transaction's account keys")]
    SignerNotFound(Pubkey),
    #[error("RPC call failed: {0}")]
    Rpc(String),
    #[error("transaction for chain {0} was not confirmed before the deadline")]
    ConfirmationTimeout(ChainId),
    #[error("account {0} not found")]
    AccountNotFound(Pubkey),
}

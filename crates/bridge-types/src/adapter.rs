//! Construction and identity traits shared by both chain adapters.

use async_trait::async_trait;

use crate::chain_id::ChainId;

/// Discriminates which chain kind an adapter wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
    Evm,
    Svm,
}

/// Constructs `Self` from a chain-specific config type. Implemented by
/// both chain adapters (`Eip155`-style and `Solana`-style) the same way
/// regardless of which concrete config shape they take.
#[async_trait]
pub trait FromConfig<TConfig>: Sized {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn from_config(config: &TConfig) -> Result<Self, Self::Error>;
}

/// Shared identity surface every chain adapter exposes: its kind and the
/// chain id it is bound to. No cross-chain awareness lives here.
pub trait ChainAdapter: Send + Sync {
    fn kind(&self) -> ChainKind;
    fn chain_id(&self) -> &ChainId;
}

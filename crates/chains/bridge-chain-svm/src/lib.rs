//! The SVM chain adapter.

pub mod config;
pub mod error;
pub mod provider;

pub use config::{Base58Keypair, KeypairSource, SvmChainConfig};
pub use error::SvmChainProviderError;
pub use provider::SvmChainProvider;

//! Config types for the EVM chain adapter: a chain reference, a list of
//! RPC endpoints (tried in order via a fallback transport layer), and an
//! optional signer.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::B256;
use bridge_types::config::{LiteralOrEnv, RpcConfig};
use serde::{Deserialize, Serialize};

/// A 32-byte EVM private key, parseable from a `0x`-prefixed hex string.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EvmPrivateKey(pub B256);

impl fmt::Debug for EvmPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EvmPrivateKey(..)")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid EVM private key: {0}")]
pub struct EvmPrivateKeyParseError(String);

impl FromStr for EvmPrivateKey {
    type Err = EvmPrivateKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(trimmed).map_err(|e| EvmPrivateKeyParseError(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(EvmPrivateKeyParseError(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(EvmPrivateKey(B256::from_slice(&bytes)))
    }
}

impl fmt::Display for EvmPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wallet construction mode. `None` yields a read-only adapter; any write
/// operation on it fails with a `ConfigError` at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EvmWalletConfig {
    None,
    PrivateKey { key: LiteralOrEnv<EvmPrivateKey> },
}

fn default_receipt_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvmChainConfig {
    /// The `eip155` CAIP-2 reference, e.g. `"8453"`.
    pub chain_reference: String,
    pub rpc: Vec<RpcConfig>,
    pub wallet: EvmWalletConfig,
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,
}

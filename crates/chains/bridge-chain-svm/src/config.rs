//! Config types for the SVM chain adapter.

use bridge_types::config::{LiteralOrEnv, RpcConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A base58-encoded 64-byte keypair, as printed by `solana-keygen`'s
/// single-line output (or the `$[1,2,3,...]` JSON array form, for
/// compatibility with keypair files read as a literal).
#[derive(Clone, PartialEq, Eq)]
pub struct Base58Keypair(pub String);

impl fmt::Debug for Base58Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Base58Keypair(..)")
    }
}

impl fmt::Display for Base58Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid base58 keypair")]
pub struct Base58KeypairParseError;

impl FromStr for Base58Keypair {
    type Err = Base58KeypairParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Base58Keypair(s.to_string()))
    }
}

/// Where the adapter's bound signer comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum KeypairSource {
    Inline { keypair: LiteralOrEnv<Base58Keypair> },
    Path { path: PathBuf },
}

fn default_max_compute_unit_limit() -> u32 {
    1_400_000
}

fn default_max_compute_unit_price() -> u64 {
    1_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvmChainConfig {
    /// The `solana` CAIP-2 reference, e.g. `"mainnet"`, `"devnet"`.
    pub chain_reference: String,
    pub rpc: RpcConfig,
    #[serde(default)]
    pub ws: Option<url::Url>,
    pub keypair: KeypairSource,
    #[serde(default = "default_max_compute_unit_limit")]
    pub max_compute_unit_limit: u32,
    #[serde(default = "default_max_compute_unit_price")]
    pub max_compute_unit_price: u64,
}

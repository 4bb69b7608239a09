//! The public config document: `{chains, bridgeConfig, defaults, logger}`.
//! `BridgeClient::new` consumes one of these to build both chain
//! providers, both engines, and the route registry.

use std::collections::HashMap;

use bridge_chain_evm::config::EvmChainConfig;
use bridge_chain_svm::config::SvmChainConfig;
use bridge_types::{BridgeError, ChainId, RelayOptions};
use serde::Deserialize;

/// One entry of the `chains` map. The variant is tagged so a config
/// document can mix EVM and SVM entries under the same map without the
/// chain id prefix alone deciding how to parse the rest of the object.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainEntryConfig {
    Evm(EvmChainConfig),
    Svm(SvmChainConfig),
}

/// `deployments.svm[chainId]`: program ids for one SVM chain's bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct SvmDeploymentConfig {
    /// Base58-encoded bridge program id.
    pub bridge_program: String,
    /// Base58-encoded relayer program id.
    pub relayer_program: String,
}

/// `deployments.evm[chainId]`: the bridge contract address for one EVM chain.
#[derive(Debug, Clone, Deserialize)]
pub struct EvmDeploymentConfig {
    /// `0x`-prefixed hex bridge contract address.
    pub bridge_contract: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeploymentsConfig {
    #[serde(default)]
    pub svm: HashMap<ChainId, SvmDeploymentConfig>,
    #[serde(default)]
    pub evm: HashMap<ChainId, EvmDeploymentConfig>,
}

/// `bridgeConfig.tokenMappings`. Keys are `"sourceChainId-destinationChainId"`
/// (e.g. `"solana:mainnet-eip155:8453"`); values map a source-chain token
/// address to its destination-chain counterpart.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenMappingsConfig(#[serde(default)] pub HashMap<String, HashMap<String, String>>);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeConfig {
    pub deployments: DeploymentsConfig,
    #[serde(default)]
    pub token_mappings: TokenMappingsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorDefaultsConfig {
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub monitor: MonitorDefaultsConfig,
    #[serde(default)]
    pub relay: Option<RelayOptions>,
}

/// The full config document. `logger` is intentionally absent here — a
/// `Logger` trait object isn't a serde type; callers pass one directly to
/// [`crate::client::BridgeClient::new_with_logger`] instead.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeClientConfig {
    pub chains: HashMap<ChainId, ChainEntryConfig>,
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Chain ids recognized as the hub: every registered route must
    /// include at least one. Defaults to every `eip155:*` chain present in
    /// `chains` when left empty, matching the "mainnet or testnet variant
    /// of Base" invariant.
    #[serde(default)]
    pub hub_chains: Vec<ChainId>,
}

impl BridgeClientConfig {
    pub(crate) fn resolved_hub_chains(&self) -> Vec<ChainId> {
        if !self.hub_chains.is_empty() {
            return self.hub_chains.clone();
        }
        self.chains
            .keys()
            .filter(|id| id.is_eip155())
            .cloned()
            .collect()
    }

    pub(crate) fn parse_token_mappings_key(key: &str) -> Result<(ChainId, ChainId), BridgeError> {
        let (source, destination) = key.split_once('-').ok_or_else(|| BridgeError::ConfigError {
            reason: format!("tokenMappings key `{key}` is not of the form `srcChain-dstChain`"),
        })?;
        let source: ChainId = source.parse().map_err(|e| BridgeError::ConfigError {
            reason: format!("invalid source chain id in tokenMappings key `{key}`: {e}"),
        })?;
        let destination: ChainId = destination.parse().map_err(|e| BridgeError::ConfigError {
            reason: format!("invalid destination chain id in tokenMappings key `{key}`: {e}"),
        })?;
        Ok((source, destination))
    }
}

//! The public entry point: wires chain adapters and engines, builds the
//! route registry, applies config-level defaults, and exposes the
//! chain-neutral surface — `transfer`, `call`, `request`, `prove`,
//! `execute`, `status`, `monitor`, `resolve_route`, `capabilities`.
//!
//! A thin composition root that owns per-chain registries and hands
//! typed errors back for anything unconfigured, rather than panicking.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use bridge_chain_evm::EvmChainProvider;
use bridge_chain_svm::SvmChainProvider;
use bridge_engine_evm::{EvmEngine, EvmEngineConfig};
use bridge_engine_svm::{SvmEngine, SvmEngineConfig};
use bridge_routes::{EvmToSvmRoute, MonitorExt, MonitorOptions, MonitorStream, RouteAdapter, RouteRegistry, SvmToEvmRoute, TokenMappings};
use bridge_types::adapter::FromConfig;
use bridge_types::{
    AssetRef, BridgeAction, BridgeError, BridgeRequest, BridgeRoute, CallType, ChainId, Logger,
    MessageRef, NestedCall, RelayOptions, RouteCapabilities, TracingLogger,
};

use crate::config::{BridgeClientConfig, ChainEntryConfig};

/// Everything the client needs to build route adapters for one ordered
/// chain pair: the two engines plus the mappings scoped to that pair.
struct RoutePair {
    svm_engine: Arc<SvmEngine>,
    evm_engine: Arc<EvmEngine>,
    token_mappings: Arc<TokenMappings>,
}

/// The chain-neutral bridge client. Holds the built chain adapters/engines
/// (one of each per configured chain) and a [`RouteRegistry`] that lazily
/// builds and caches a [`RouteAdapter`] per `(source, destination)` pair on
/// first use — the registry's `DashMap` cache is the single-flight cache;
/// the client does not duplicate it.
pub struct BridgeClient {
    registry: RouteRegistry,
    logger: Arc<dyn Logger>,
    default_monitor_options: MonitorOptions,
    default_relay: Option<RelayOptions>,
}

impl std::fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeClient").finish_non_exhaustive()
    }
}

fn parse_evm_address(raw: &str) -> Result<alloy_primitives::Address, BridgeError> {
    alloy_primitives::Address::from_str(raw.trim()).map_err(|e| BridgeError::ConfigError {
        reason: format!("invalid EVM address `{raw}`: {e}"),
    })
}

fn parse_svm_pubkey(raw: &str) -> Result<solana_pubkey::Pubkey, BridgeError> {
    solana_pubkey::Pubkey::from_str(raw.trim()).map_err(|e| BridgeError::ConfigError {
        reason: format!("invalid SVM pubkey `{raw}`: {e}"),
    })
}

impl BridgeClient {
    /// Builds chain providers/engines for every configured chain, wires
    /// token mappings, and registers both directions for every SVM/EVM
    /// chain pair that satisfies the hub invariant. Uses the default
    /// `TracingLogger`; see [`Self::new_with_logger`] to supply your own.
    pub async fn new(config: BridgeClientConfig) -> Result<Self, BridgeError> {
        Self::new_with_logger(config, Arc::new(TracingLogger)).await
    }

    pub async fn new_with_logger(
        config: BridgeClientConfig,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, BridgeError> {
        let hub_chains = config.resolved_hub_chains();

        let mut evm_chains: HashMap<ChainId, Arc<EvmChainProvider>> = HashMap::new();
        let mut svm_chains: HashMap<ChainId, Arc<SvmChainProvider>> = HashMap::new();

        for (chain_id, entry) in &config.chains {
            match entry {
                ChainEntryConfig::Evm(evm_config) => {
                    if evm_chains.contains_key(chain_id) || svm_chains.contains_key(chain_id) {
                        return Err(BridgeError::ConfigError {
                            reason: format!("duplicate chain registration for {chain_id}"),
                        });
                    }
                    let provider = EvmChainProvider::from_config(evm_config)
                        .await
                        .map_err(|e| BridgeError::ConfigError {
                            reason: format!("failed constructing EVM adapter for {chain_id}: {e}"),
                        })?;
                    evm_chains.insert(chain_id.clone(), Arc::new(provider));
                }
                ChainEntryConfig::Svm(svm_config) => {
                    if evm_chains.contains_key(chain_id) || svm_chains.contains_key(chain_id) {
                        return Err(BridgeError::ConfigError {
                            reason: format!("duplicate chain registration for {chain_id}"),
                        });
                    }
                    let provider = SvmChainProvider::from_config(svm_config)
                        .await
                        .map_err(|e| BridgeError::ConfigError {
                            reason: format!("failed constructing SVM adapter for {chain_id}: {e}"),
                        })?;
                    svm_chains.insert(chain_id.clone(), Arc::new(provider));
                }
            }
        }

        let mut token_mappings_by_pair: HashMap<(ChainId, ChainId), TokenMappings> = HashMap::new();
        for (key, mappings) in &config.bridge.token_mappings.0 {
            let (source, destination) = BridgeClientConfig::parse_token_mappings_key(key)?;
            let entry = token_mappings_by_pair
                .entry((source.clone(), destination.clone()))
                .or_default();
            for (src_token, dst_token) in mappings {
                entry.insert(source.clone(), destination.clone(), src_token.clone(), dst_token.clone());
            }
        }

        let mut svm_engines: HashMap<ChainId, Arc<SvmEngine>> = HashMap::new();
        for (chain_id, deployment) in &config.bridge.deployments.svm {
            let chain = svm_chains.get(chain_id).ok_or_else(|| BridgeError::ConfigError {
                reason: format!("deployments.svm has an entry for {chain_id} but no matching chains[{chain_id}]"),
            })?;
            let engine_config = SvmEngineConfig {
                bridge_program: parse_svm_pubkey(&deployment.bridge_program)?,
                relayer_program: parse_svm_pubkey(&deployment.relayer_program)?,
            };
            svm_engines.insert(chain_id.clone(), Arc::new(SvmEngine::new(Arc::clone(chain), engine_config)));
        }

        let mut evm_engines: HashMap<ChainId, Arc<EvmEngine>> = HashMap::new();
        for (chain_id, deployment) in &config.bridge.deployments.evm {
            let chain = evm_chains.get(chain_id).ok_or_else(|| BridgeError::ConfigError {
                reason: format!("deployments.evm has an entry for {chain_id} but no matching chains[{chain_id}]"),
            })?;
            let engine_config = EvmEngineConfig {
                bridge_contract: parse_evm_address(&deployment.bridge_contract)?,
            };
            evm_engines.insert(chain_id.clone(), Arc::new(EvmEngine::new(Arc::clone(chain), engine_config)));
        }

        let mut registry = RouteRegistry::new(hub_chains);

        for (svm_chain_id, svm_engine) in &svm_engines {
            for (evm_chain_id, evm_engine) in &evm_engines {
                let forward_mappings = Arc::new(
                    token_mappings_by_pair
                        .get(&(svm_chain_id.clone(), evm_chain_id.clone()))
                        .cloned()
                        .unwrap_or_default(),
                );
                let reverse_mappings = Arc::new(
                    token_mappings_by_pair
                        .get(&(evm_chain_id.clone(), svm_chain_id.clone()))
                        .cloned()
                        .unwrap_or_default(),
                );

                let pair = RoutePair {
                    svm_engine: Arc::clone(svm_engine),
                    evm_engine: Arc::clone(evm_engine),
                    token_mappings: forward_mappings,
                };
                let route = BridgeRoute::new(svm_chain_id.clone(), evm_chain_id.clone());
                let factory_route = route.clone();
                let factory: bridge_routes::RouteFactory = Arc::new(move || {
                    Arc::new(SvmToEvmRoute::new(
                        factory_route.clone(),
                        Arc::clone(&pair.svm_engine),
                        Arc::clone(&pair.evm_engine),
                        Arc::clone(&pair.token_mappings),
                    )) as Arc<dyn RouteAdapter>
                });
                // A pair violating the hub invariant is simply not
                // registered; `register` would reject it anyway, but
                // skipping keeps a misconfigured non-hub chain from
                // surfacing as a construction-time `ConfigError` when it
                // was never meant to route through this client at all.
                let _ = registry.register(route.source_chain.clone(), route.destination_chain.clone(), factory);

                let pair = RoutePair {
                    svm_engine: Arc::clone(svm_engine),
                    evm_engine: Arc::clone(evm_engine),
                    token_mappings: reverse_mappings,
                };
                let route = BridgeRoute::new(evm_chain_id.clone(), svm_chain_id.clone());
                let factory_route = route.clone();
                let factory: bridge_routes::RouteFactory = Arc::new(move || {
                    Arc::new(EvmToSvmRoute::new(
                        factory_route.clone(),
                        Arc::clone(&pair.evm_engine),
                        Arc::clone(&pair.svm_engine),
                        Arc::clone(&pair.token_mappings),
                    )) as Arc<dyn RouteAdapter>
                });
                let _ = registry.register(route.source_chain.clone(), route.destination_chain.clone(), factory);
            }
        }

        let default_monitor_options = MonitorOptions {
            timeout: config
                .defaults
                .monitor
                .timeout_ms
                .map(std::time::Duration::from_millis)
                .unwrap_or(MonitorOptions::default().timeout),
            poll_interval: config
                .defaults
                .monitor
                .poll_interval_ms
                .map(std::time::Duration::from_millis)
                .unwrap_or(MonitorOptions::default().poll_interval),
        };

        Ok(Self {
            registry,
            logger,
            default_monitor_options,
            default_relay: config.defaults.relay.clone(),
        })
    }

    /// Resolves (building and caching on first use) the route adapter for
    /// `route`. `UnsupportedRoute` covers both "violates the hub
    /// invariant" and "no adapter configured for this exact pair".
    pub fn resolve_route(&self, route: &BridgeRoute) -> Result<Arc<dyn RouteAdapter>, BridgeError> {
        self.registry.resolve(route)
    }

    pub fn capabilities(&self, route: &BridgeRoute) -> Result<RouteCapabilities, BridgeError> {
        Ok(self.resolve_route(route)?.capabilities())
    }

    fn fill_relay_defaults(&self, mut request: BridgeRequest) -> BridgeRequest {
        if request.relay.is_none() {
            request.relay = self.default_relay.clone();
        }
        request
    }

    /// The durable entry point: initiates `request.action` on `request.route`.
    pub async fn request(&self, request: BridgeRequest) -> Result<MessageRef, BridgeError> {
        let request = self.fill_relay_defaults(request);
        let adapter = self.resolve_route(&request.route)?;
        self.logger.info(&format!(
            "initiating {:?} on {} -> {}",
            request.action, request.route.source_chain, request.route.destination_chain
        ));
        adapter.initiate(&request).await
    }

    /// Convenience wrapper over [`Self::request`] for a `Transfer` action.
    #[allow(clippy::too_many_arguments)]
    pub async fn transfer(
        &self,
        route: BridgeRoute,
        asset: AssetRef,
        amount: u64,
        recipient: impl Into<String>,
        call: Option<NestedCall>,
        idempotency_key: Option<String>,
        relay: Option<RelayOptions>,
    ) -> Result<MessageRef, BridgeError> {
        self.request(BridgeRequest {
            route,
            action: BridgeAction::Transfer {
                asset,
                amount,
                recipient: recipient.into(),
                call: call.map(Box::new),
            },
            idempotency_key,
            relay,
            metadata: HashMap::new(),
        })
        .await
    }

    /// Convenience wrapper over [`Self::request`] for a `Call` action.
    pub async fn call(
        &self,
        route: BridgeRoute,
        to: impl Into<String>,
        value: u128,
        data: Vec<u8>,
        call_type: CallType,
        idempotency_key: Option<String>,
        relay: Option<RelayOptions>,
    ) -> Result<MessageRef, BridgeError> {
        self.request(BridgeRequest {
            route,
            action: BridgeAction::Call {
                to: to.into(),
                value,
                data,
                call_type,
            },
            idempotency_key,
            relay,
            metadata: HashMap::new(),
        })
        .await
    }

    pub async fn prove(&self, message: &MessageRef) -> Result<MessageRef, BridgeError> {
        self.resolve_route(&message.route)?.prove(message).await
    }

    pub async fn execute(&self, message: &MessageRef) -> Result<MessageRef, BridgeError> {
        self.resolve_route(&message.route)?.execute(message).await
    }

    pub async fn status(&self, message: &MessageRef) -> Result<bridge_types::ExecutionStatus, BridgeError> {
        self.resolve_route(&message.route)?.status(message).await
    }

    /// Starts a fresh polling loop over `message`'s status, merging
    /// `options` over the client's configured defaults. A new call on the
    /// same `MessageRef` always starts a fresh probe loop.
    pub fn monitor(&self, message: MessageRef, options: Option<MonitorOptions>) -> Result<MonitorStream, BridgeError> {
        let adapter = self.resolve_route(&message.route)?;
        Ok(adapter.monitor(message, options.unwrap_or(self.default_monitor_options)))
    }
}

//! Maps `(sourceChain, destinationChain)` to a route adapter, enforcing
//! the hub-and-spoke invariant. A lookup miss becomes `UnsupportedRoute`
//! rather than a panic, and duplicate registration is rejected at
//! construction.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bridge_types::{BridgeError, BridgeRoute, ChainId};
use dashmap::DashMap;

use crate::adapter::RouteAdapter;

/// Builds a route adapter for one concrete `(source, destination)` chain
/// pair on first access. Boxed so the registry can hold factories for
/// routes it has not yet built an adapter for.
pub type RouteFactory = Arc<dyn Fn() -> Arc<dyn RouteAdapter> + Send + Sync>;

/// Maps chain pairs to route-adapter factories, and caches the adapters
/// those factories build. Concurrent cache misses for the same key
/// resolve to the same adapter instance via `DashMap::entry`'s per-shard
/// lock (single-flight).
pub struct RouteRegistry {
    hub_chains: HashSet<ChainId>,
    factories: HashMap<(ChainId, ChainId), RouteFactory>,
    cache: DashMap<(ChainId, ChainId), Arc<dyn RouteAdapter>>,
}

impl RouteRegistry {
    /// `hub_chains` is the set of EVM chain ids recognized as "the hub"
    /// (mainnet and/or testnet variants of Base); every registered route
    /// must have at least one endpoint in this set.
    pub fn new(hub_chains: impl IntoIterator<Item = ChainId>) -> Self {
        Self {
            hub_chains: hub_chains.into_iter().collect(),
            factories: HashMap::new(),
            cache: DashMap::new(),
        }
    }

    fn is_hub(&self, chain: &ChainId) -> bool {
        self.hub_chains.contains(chain)
    }

    /// Registers a route-adapter factory for one chain pair. Rejects
    /// pairs that violate the hub invariant, and rejects re-registering a
    /// pair that already has a factory.
    pub fn register(
        &mut self,
        source: ChainId,
        destination: ChainId,
        factory: RouteFactory,
    ) -> Result<(), BridgeError> {
        if !self.is_hub(&source) && !self.is_hub(&destination) {
            return Err(BridgeError::UnsupportedRoute {
                route: Some(BridgeRoute::new(source, destination)),
            });
        }
        let key = (source.clone(), destination.clone());
        if self.factories.contains_key(&key) {
            return Err(BridgeError::ConfigError {
                reason: format!("a route is already registered for {source} -> {destination}"),
            });
        }
        self.factories.insert(key, factory);
        Ok(())
    }

    /// Resolves the route adapter for `route`, building (and caching) it
    /// on first access. Returns `UnsupportedRoute` for any pair with no
    /// registered factory, including pairs that would satisfy the hub
    /// invariant but were never configured.
    pub fn resolve(&self, route: &BridgeRoute) -> Result<Arc<dyn RouteAdapter>, BridgeError> {
        let key = (route.source_chain.clone(), route.destination_chain.clone());
        if let Some(existing) = self.cache.get(&key) {
            return Ok(Arc::clone(&existing));
        }
        let factory = self.factories.get(&key).ok_or_else(|| BridgeError::UnsupportedRoute {
            route: Some(route.clone()),
        })?;
        let adapter = self
            .cache
            .entry(key)
            .or_insert_with(|| factory())
            .value()
            .clone();
        Ok(adapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_types::{BridgeRequest, ExecutionStatus, MessageRef, RouteCapabilities};

    struct StubAdapter;

    #[async_trait]
    impl RouteAdapter for StubAdapter {
        fn capabilities(&self) -> RouteCapabilities {
            RouteCapabilities::default()
        }
        async fn initiate(&self, _request: &BridgeRequest) -> Result<MessageRef, BridgeError> {
            unimplemented!()
        }
        async fn prove(&self, _message: &MessageRef) -> Result<MessageRef, BridgeError> {
            unimplemented!()
        }
        async fn execute(&self, _message: &MessageRef) -> Result<MessageRef, BridgeError> {
            unimplemented!()
        }
        async fn status(&self, _message: &MessageRef) -> Result<ExecutionStatus, BridgeError> {
            unimplemented!()
        }
    }

    fn hub() -> ChainId {
        ChainId::new("eip155", "8453")
    }

    fn non_hub_evm() -> ChainId {
        ChainId::new("eip155", "1")
    }

    fn svm() -> ChainId {
        ChainId::new("solana", "mainnet")
    }

    #[test]
    fn rejects_routes_missing_the_hub_chain() {
        let mut registry = RouteRegistry::new([hub()]);
        let err = registry
            .register(svm(), non_hub_evm(), Arc::new(|| Arc::new(StubAdapter) as Arc<dyn RouteAdapter>))
            .unwrap_err();
        assert!(matches!(err, BridgeError::UnsupportedRoute { .. }));
    }

    #[test]
    fn rejects_duplicate_registration() {
        let mut registry = RouteRegistry::new([hub()]);
        registry
            .register(svm(), hub(), Arc::new(|| Arc::new(StubAdapter) as Arc<dyn RouteAdapter>))
            .unwrap();
        let err = registry
            .register(svm(), hub(), Arc::new(|| Arc::new(StubAdapter) as Arc<dyn RouteAdapter>))
            .unwrap_err();
        assert!(matches!(err, BridgeError::ConfigError { .. }));
    }

    #[test]
    fn resolve_caches_the_built_adapter() {
        let mut registry = RouteRegistry::new([hub()]);
        registry
            .register(svm(), hub(), Arc::new(|| Arc::new(StubAdapter) as Arc<dyn RouteAdapter>))
            .unwrap();
        let route = BridgeRoute::new(svm(), hub());
        let a = registry.resolve(&route).unwrap();
        let b = registry.resolve(&route).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn resolve_rejects_unregistered_pairs() {
        let registry = RouteRegistry::new([hub()]);
        let route = BridgeRoute::new(svm(), hub());
        assert!(registry.resolve(&route).is_err());
    }
}

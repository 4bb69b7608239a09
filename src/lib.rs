//! Client SDK for the SVM↔Base asset and message bridge.
//!
//! This crate is the composition root over the workspace's per-concern
//! crates: chain-specific read/write adapters (`bridge-chain-evm`,
//! `bridge-chain-svm`), the source engines that build and submit
//! bridge transactions (`bridge-engine-evm`, `bridge-engine-svm`), the
//! canonical cross-chain message identity and ABI encoding
//! (`bridge-codec`), and the route adapters/registry/monitor that
//! together drive a message through `initiate → [prove] → execute`
//! (`bridge-routes`). [`client::BridgeClient`] is the only type most
//! callers need.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> Result<(), bridge_types::BridgeError> {
//! use bridge_sdk::{BridgeClient, BridgeClientConfig};
//!
//! let config: BridgeClientConfig = serde_json::from_str(r#"{
//!     "chains": {},
//!     "bridge": { "deployments": { "svm": {}, "evm": {} } }
//! }"#).unwrap();
//! let client = BridgeClient::new(config).await?;
//! let route = bridge_types::BridgeRoute::new(
//!     "solana:mainnet".parse().unwrap(),
//!     "eip155:8453".parse().unwrap(),
//! );
//! let _ = client.resolve_route(&route);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;

pub use client::BridgeClient;
pub use config::{
    BridgeClientConfig, BridgeConfig, ChainEntryConfig, DefaultsConfig, DeploymentsConfig,
    EvmDeploymentConfig, MonitorDefaultsConfig, SvmDeploymentConfig, TokenMappingsConfig,
};

pub use bridge_routes::{MonitorOptions, MonitorStream, RouteAdapter};
pub use bridge_types::{
    AssetRef, BridgeAction, BridgeError, BridgeRequest, BridgeRoute, CallType, ChainId,
    ExecutionStatus, LogLevel, Logger, MessageEndpointRef, MessageId, MessageRef, NestedCall,
    NullLogger, RelayMode, RelayOptions, RouteCapabilities, TracingLogger,
};

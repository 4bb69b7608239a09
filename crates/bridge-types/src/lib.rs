//! Shared data model, error taxonomy, logging and config primitives used
//! by every other crate in the bridge SDK workspace.

pub mod adapter;
pub mod chain_id;
pub mod config;
pub mod error;
pub mod logger;
pub mod model;

pub use adapter::{ChainAdapter, ChainKind, FromConfig};
pub use chain_id::{ChainId, ChainIdFormatError, ChainIdPattern};
pub use config::{LiteralOrEnv, RpcConfig};
pub use error::{BridgeError, ErrorOutcome, ErrorStage};
pub use logger::{LogLevel, Logger, NullLogger, TracingLogger};
pub use model::{
    AssetRef, BridgeAction, BridgeRequest, BridgeRoute, CallType, ExecutionStatus,
    MessageEndpointRef, MessageId, MessageRef, NestedCall, RelayMode, RelayOptions,
    RouteCapabilities, StatusKey,
};

//! The uniform contract every route direction implements, and the
//! generic `monitor` extension built on top of it. Only two directions
//! exist (`SvmToEvmRoute`, `EvmToSvmRoute`), so this trait's surface is
//! small and fixed: a closed set of implementations rather than an
//! extensible hierarchy.

use std::sync::Arc;

use async_trait::async_trait;
use bridge_types::{BridgeError, BridgeRequest, ExecutionStatus, MessageRef, RouteCapabilities};

use crate::monitor::{self, MonitorOptions, MonitorStream};

#[async_trait]
pub trait RouteAdapter: Send + Sync {
    fn capabilities(&self) -> RouteCapabilities;

    async fn initiate(&self, request: &BridgeRequest) -> Result<MessageRef, BridgeError>;

    async fn prove(&self, message: &MessageRef) -> Result<MessageRef, BridgeError>;

    async fn execute(&self, message: &MessageRef) -> Result<MessageRef, BridgeError>;

    async fn status(&self, message: &MessageRef) -> Result<ExecutionStatus, BridgeError>;
}

/// `monitor` is the same generic polling loop for every route direction —
/// it only needs `status` — so it is implemented once here rather than
/// duplicated per adapter. Calling it a second time on the same
/// `MessageRef` starts a fresh probe loop: iteration is lazy and
/// restartable.
pub trait MonitorExt {
    fn monitor(&self, message: MessageRef, options: MonitorOptions) -> MonitorStream;
}

impl MonitorExt for Arc<dyn RouteAdapter> {
    fn monitor(&self, message: MessageRef, options: MonitorOptions) -> MonitorStream {
        let adapter = Arc::clone(self);
        monitor::monitor_status_stream(
            move || {
                let adapter = Arc::clone(&adapter);
                let message = message.clone();
                async move { adapter.status(&message).await }
            },
            options,
        )
    }
}

//! End-to-end scenario tests driven against stub `RouteAdapter`
//! implementations rather than live RPC, exercising the same state
//! machine the route adapters and monitor drive in production.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use bridge_routes::{MonitorExt, MonitorOptions, RouteAdapter};
use bridge_types::{
    AssetRef, BridgeAction, BridgeError, BridgeRequest, BridgeRoute, ExecutionStatus,
    MessageEndpointRef, MessageId, MessageRef, RelayMode, RelayOptions, RouteCapabilities,
};
use tokio_stream::StreamExt;

fn svm_mainnet() -> bridge_types::ChainId {
    "solana:mainnet".parse().unwrap()
}

fn base() -> bridge_types::ChainId {
    "eip155:8453".parse().unwrap()
}

/// A stub standing in for `SvmToEvmRoute`: the outer hash is derivable at
/// initiation time, so both endpoints are populated up front, and status
/// walks the transition DAG on a fixed schedule.
struct StubSvmToEvm {
    poll_count: AtomicUsize,
    token_mappings: HashMap<String, String>,
}

#[async_trait]
impl RouteAdapter for StubSvmToEvm {
    fn capabilities(&self) -> RouteCapabilities {
        RouteCapabilities {
            steps: vec!["initiate".into(), "execute".into(), "monitor".into()],
            auto_relay: true,
            manual_execute: true,
            prove: false,
            min_delay_ms: None,
            max_window_ms: None,
        }
    }

    async fn initiate(&self, request: &BridgeRequest) -> Result<MessageRef, BridgeError> {
        let BridgeAction::Transfer { asset, .. } = &request.action else {
            return Err(BridgeError::UnsupportedAction {
                reason: "only transfers are supported".into(),
                route: Some(request.route.clone()),
            });
        };
        if let AssetRef::Token { address } = asset {
            if !self.token_mappings.contains_key(address) {
                return Err(BridgeError::UnsupportedAction {
                    reason: format!("no token mapping registered for {address}"),
                    route: Some(request.route.clone()),
                });
            }
        }
        Ok(MessageRef {
            route: request.route.clone(),
            source: MessageEndpointRef {
                id: MessageId::SvmOutgoingMessagePda {
                    pda: "11111111111111111111111111111111111111111".into(),
                },
            },
            destination: Some(MessageEndpointRef {
                id: MessageId::EvmBridgeOuterHash {
                    hash: "0x".to_string() + &"ab".repeat(32),
                },
            }),
            derived: HashMap::new(),
        })
    }

    async fn prove(&self, _message: &MessageRef) -> Result<MessageRef, BridgeError> {
        Err(BridgeError::UnsupportedStep {
            step: "prove".into(),
            route: None,
        })
    }

    async fn execute(&self, message: &MessageRef) -> Result<MessageRef, BridgeError> {
        Ok(message.clone())
    }

    async fn status(&self, _message: &MessageRef) -> Result<ExecutionStatus, BridgeError> {
        let at = SystemTime::now();
        let n = self.poll_count.fetch_add(1, Ordering::SeqCst);
        Ok(match n {
            0 => ExecutionStatus::Initiated { at, source_tx: Some("sig1".into()) },
            1 => ExecutionStatus::FinalizedOnSource { at, finality: Some("finalized".into()) },
            2 => ExecutionStatus::Executable { at },
            _ => ExecutionStatus::Executed { at, execution_tx: Some("0xexec".into()) },
        })
    }
}

#[tokio::test]
async fn svm_to_evm_native_transfer_with_auto_relay_reaches_executed() {
    let adapter = StubSvmToEvm {
        poll_count: AtomicUsize::new(0),
        token_mappings: HashMap::new(),
    };
    let request = BridgeRequest {
        route: BridgeRoute::new(svm_mainnet(), base()),
        action: BridgeAction::Transfer {
            asset: AssetRef::Native,
            amount: 1_000_000,
            recipient: "0x644e3b3e6699574bd4bac38153a2e0dd14a474dc".into(),
            call: None,
        },
        idempotency_key: None,
        relay: Some(RelayOptions {
            mode: Some(RelayMode::Auto),
            ..Default::default()
        }),
        metadata: HashMap::new(),
    };

    let message = adapter.initiate(&request).await.unwrap();
    assert!(matches!(message.source.id, MessageId::SvmOutgoingMessagePda { .. }));
    assert!(matches!(
        message.destination.as_ref().unwrap().id,
        MessageId::EvmBridgeOuterHash { .. }
    ));

    let adapter: Arc<dyn RouteAdapter> = Arc::new(adapter);
    let stream = adapter.monitor(
        message,
        MonitorOptions {
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(1),
        },
    );
    let results: Vec<_> = stream.collect().await;
    let last = results.last().unwrap().as_ref().unwrap();
    assert!(last.is_terminal());
    assert!(matches!(last, ExecutionStatus::Executed { .. }));
}

#[tokio::test]
async fn svm_to_evm_token_transfer_missing_mapping_is_rejected() {
    let adapter = StubSvmToEvm {
        poll_count: AtomicUsize::new(0),
        token_mappings: HashMap::new(),
    };
    let request = BridgeRequest {
        route: BridgeRoute::new(svm_mainnet(), base()),
        action: BridgeAction::Transfer {
            asset: AssetRef::Token {
                address: "So11111111111111111111111111111111111111112".into(),
            },
            amount: 1,
            recipient: "0x644e3b3e6699574bd4bac38153a2e0dd14a474dc".into(),
            call: None,
        },
        idempotency_key: None,
        relay: None,
        metadata: HashMap::new(),
    };

    let err = adapter.initiate(&request).await.unwrap_err();
    assert!(matches!(err, BridgeError::UnsupportedAction { .. }));
}

/// A stub standing in for `EvmToSvmRoute`: `prove` is a real step here, and
/// `execute` is idempotent, raising `AlreadyExecuted` on a repeat call.
struct StubEvmToSvm {
    executed: Mutex<bool>,
}

#[async_trait]
impl RouteAdapter for StubEvmToSvm {
    fn capabilities(&self) -> RouteCapabilities {
        RouteCapabilities {
            steps: vec!["initiate".into(), "prove".into(), "execute".into(), "monitor".into()],
            auto_relay: false,
            manual_execute: true,
            prove: true,
            min_delay_ms: None,
            max_window_ms: None,
        }
    }

    async fn initiate(&self, request: &BridgeRequest) -> Result<MessageRef, BridgeError> {
        let mut derived = HashMap::new();
        derived.insert("txHash".to_string(), "0xdeadbeef".to_string());
        Ok(MessageRef {
            route: request.route.clone(),
            source: MessageEndpointRef {
                id: MessageId::EvmMessageHash {
                    hash: "0x".to_string() + &"11".repeat(32),
                },
            },
            destination: None,
            derived,
        })
    }

    async fn prove(&self, message: &MessageRef) -> Result<MessageRef, BridgeError> {
        let mut derived = message.derived.clone();
        derived.insert("proofTx".to_string(), "sig-prove".to_string());
        Ok(MessageRef {
            route: message.route.clone(),
            source: message.source.clone(),
            destination: Some(MessageEndpointRef {
                id: MessageId::SvmIncomingMessagePda {
                    pda: "22222222222222222222222222222222222222222".into(),
                },
            }),
            derived,
        })
    }

    async fn execute(&self, message: &MessageRef) -> Result<MessageRef, BridgeError> {
        let mut executed = self.executed.lock().unwrap();
        if *executed {
            return Err(BridgeError::AlreadyExecuted {
                route: Some(message.route.clone()),
            });
        }
        *executed = true;
        let mut derived = message.derived.clone();
        derived.insert("executionTx".to_string(), "sig-execute".to_string());
        Ok(MessageRef {
            route: message.route.clone(),
            source: message.source.clone(),
            destination: message.destination.clone(),
            derived,
        })
    }

    async fn status(&self, _message: &MessageRef) -> Result<ExecutionStatus, BridgeError> {
        Ok(ExecutionStatus::Unknown { at: SystemTime::now() })
    }
}

#[tokio::test]
async fn evm_to_svm_token_transfer_proves_then_executes_and_rejects_second_execute() {
    let adapter = StubEvmToSvm {
        executed: Mutex::new(false),
    };
    let request = BridgeRequest {
        route: BridgeRoute::new(base(), svm_mainnet()),
        action: BridgeAction::Transfer {
            asset: AssetRef::Token {
                address: "0x0000000000000000000000000000000000000000".into(),
            },
            amount: 1,
            recipient: "11111111111111111111111111111111111111111".into(),
            call: None,
        },
        idempotency_key: None,
        relay: None,
        metadata: HashMap::new(),
    };

    let initiated = adapter.initiate(&request).await.unwrap();
    assert!(matches!(initiated.source.id, MessageId::EvmMessageHash { .. }));
    assert_eq!(initiated.derived.get("txHash").map(String::as_str), Some("0xdeadbeef"));

    let proven = adapter.prove(&initiated).await.unwrap();
    assert!(proven.derived.contains_key("proofTx"));
    assert!(matches!(
        proven.destination.as_ref().unwrap().id,
        MessageId::SvmIncomingMessagePda { .. }
    ));

    let executed = adapter.execute(&proven).await.unwrap();
    assert!(executed.derived.contains_key("executionTx"));

    let second = adapter.execute(&executed).await.unwrap_err();
    assert!(matches!(second, BridgeError::AlreadyExecuted { .. }));
}

#[tokio::test]
async fn idempotent_retry_yields_the_same_outgoing_pda() {
    use bridge_engine_svm::salt::salt_for_idempotency_key;

    let key = "retry-me-once";
    let salt_a = salt_for_idempotency_key(key);
    let salt_b = salt_for_idempotency_key(key);
    assert_eq!(salt_a, salt_b);

    // Two initiate calls carrying the same idempotency key must land on the
    // same outgoing-message PDA, regardless of how many times the caller
    // retries the submission.
    let program = solana_pubkey::Pubkey::new_unique();
    let (pda_a, _) = bridge_engine_svm::pda::outgoing_message_pda(&program, &salt_a);
    let (pda_b, _) = bridge_engine_svm::pda::outgoing_message_pda(&program, &salt_b);
    assert_eq!(pda_a, pda_b);
}

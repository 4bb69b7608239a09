//! The chain-neutral data model: routes, assets, actions, requests,
//! message identity, and execution status. All variant types are plain
//! Rust enums (tagged unions) — the set of variants is fixed and
//! exhaustive, so there is no trait-object hierarchy to extend.

use std::collections::HashMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::chain_id::ChainId;

/// A source/destination chain pair. Representation is symmetric; semantics
/// are not — direction determines which route adapter handles the pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BridgeRoute {
    pub source_chain: ChainId,
    pub destination_chain: ChainId,
}

impl BridgeRoute {
    pub fn new(source_chain: ChainId, destination_chain: ChainId) -> Self {
        Self {
            source_chain,
            destination_chain,
        }
    }
}

/// A reference to an asset, scoped to whichever chain it is read on.
/// `Token`/`Wrapped` addresses are chain-native: EVM hex for EVM tokens,
/// base58 mint for SVM mints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetRef {
    Native,
    Token { address: String },
    Wrapped { address: String },
}

/// The EVM `callType` discriminant carried on an arbitrary-call action.
pub type CallType = u8;

/// A cross-chain action. `Transfer` may carry a nested `call`, meaning
/// "after crediting funds on the destination, perform this call".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BridgeAction {
    Transfer {
        asset: AssetRef,
        amount: u64,
        recipient: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        call: Option<Box<NestedCall>>,
    },
    Call {
        to: String,
        value: u128,
        data: Vec<u8>,
        call_type: CallType,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedCall {
    pub to: String,
    pub value: u128,
    pub data: Vec<u8>,
    pub call_type: CallType,
}

/// `auto` attaches a pay-for-relay side instruction so an off-chain relayer
/// executes on destination; `manual` leaves execution to the caller;
/// `none` performs initiation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayMode {
    Auto,
    Manual,
    None,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayOptions {
    #[serde(default = "default_relay_mode")]
    pub mode: Option<RelayMode>,
    #[serde(default)]
    pub gas_limit: Option<u64>,
    #[serde(default)]
    pub max_fee_per_gas: Option<u128>,
    #[serde(default)]
    pub max_priority_fee_per_gas: Option<u128>,
}

fn default_relay_mode() -> Option<RelayMode> {
    Some(RelayMode::Auto)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeRequest {
    pub route: BridgeRoute,
    pub action: BridgeAction,
    #[serde(default)]
    pub idempotency_key: Option<String>,
    #[serde(default)]
    pub relay: Option<RelayOptions>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// A tagged identity scheme. Each variant names the chain it is native to
/// and the exact string/byte encoding it's carried as.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scheme")]
pub enum MessageId {
    #[serde(rename = "svm:outgoingMessagePda")]
    SvmOutgoingMessagePda { pda: String },
    #[serde(rename = "svm:incomingMessagePda")]
    SvmIncomingMessagePda { pda: String },
    #[serde(rename = "evm:txHash")]
    EvmTxHash { hash: String },
    #[serde(rename = "evm:messageHash")]
    EvmMessageHash { hash: String },
    #[serde(rename = "evm:bridgeOuterHash")]
    EvmBridgeOuterHash { hash: String },
}

impl MessageId {
    pub fn scheme(&self) -> &'static str {
        match self {
            MessageId::SvmOutgoingMessagePda { .. } => "svm:outgoingMessagePda",
            MessageId::SvmIncomingMessagePda { .. } => "svm:incomingMessagePda",
            MessageId::EvmTxHash { .. } => "evm:txHash",
            MessageId::EvmMessageHash { .. } => "evm:messageHash",
            MessageId::EvmBridgeOuterHash { .. } => "evm:bridgeOuterHash",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEndpointRef {
    pub id: MessageId,
}

/// The durable handle a caller keeps across `initiate → [prove] → execute`.
/// `source` is always present (it is the canonical identity); `destination`
/// may be precomputed at initiation time when the outer hash is derivable
/// without waiting on destination-side observation (SVM→EVM).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRef {
    pub route: BridgeRoute,
    pub source: MessageEndpointRef,
    #[serde(default)]
    pub destination: Option<MessageEndpointRef>,
    #[serde(default)]
    pub derived: HashMap<String, String>,
}

impl MessageRef {
    pub fn derived_get(&self, key: &str) -> Option<&str> {
        self.derived.get(key).map(String::as_str)
    }
}

/// The execution lifecycle. Terminal variants: `Executed`, `Failed`,
/// `Expired`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionStatus {
    Unknown {
        at: SystemTime,
    },
    Initiated {
        at: SystemTime,
        #[serde(default)]
        source_tx: Option<String>,
    },
    FinalizedOnSource {
        at: SystemTime,
        #[serde(default)]
        finality: Option<String>,
    },
    Proven {
        at: SystemTime,
        #[serde(default)]
        proof_tx: Option<String>,
    },
    Executable {
        at: SystemTime,
    },
    Executing {
        at: SystemTime,
        #[serde(default)]
        execution_tx: Option<String>,
    },
    Executed {
        at: SystemTime,
        #[serde(default)]
        execution_tx: Option<String>,
    },
    Failed {
        at: SystemTime,
        reason: String,
        #[serde(default)]
        execution_tx: Option<String>,
    },
    Expired {
        at: SystemTime,
        #[serde(default)]
        reason: Option<String>,
    },
}

/// The discriminant plus distinguishing fields of an [`ExecutionStatus`],
/// used by the monitor to decide whether a status is "new" and worth
/// yielding, independent of its timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusKey {
    Unknown,
    Initiated { source_tx: Option<String> },
    FinalizedOnSource { finality: Option<String> },
    Proven { proof_tx: Option<String> },
    Executable,
    Executing { execution_tx: Option<String> },
    Executed { execution_tx: Option<String> },
    Failed { reason: String },
    Expired { reason: Option<String> },
}

impl ExecutionStatus {
    pub fn at(&self) -> SystemTime {
        match self {
            ExecutionStatus::Unknown { at }
            | ExecutionStatus::Initiated { at, .. }
            | ExecutionStatus::FinalizedOnSource { at, .. }
            | ExecutionStatus::Proven { at, .. }
            | ExecutionStatus::Executable { at }
            | ExecutionStatus::Executing { at, .. }
            | ExecutionStatus::Executed { at, .. }
            | ExecutionStatus::Failed { at, .. }
            | ExecutionStatus::Expired { at, .. } => *at,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Executed { .. }
                | ExecutionStatus::Failed { .. }
                | ExecutionStatus::Expired { .. }
        )
    }

    pub fn status_key(&self) -> StatusKey {
        match self {
            ExecutionStatus::Unknown { .. } => StatusKey::Unknown,
            ExecutionStatus::Initiated { source_tx, .. } => StatusKey::Initiated {
                source_tx: source_tx.clone(),
            },
            ExecutionStatus::FinalizedOnSource { finality, .. } => {
                StatusKey::FinalizedOnSource {
                    finality: finality.clone(),
                }
            }
            ExecutionStatus::Proven { proof_tx, .. } => StatusKey::Proven {
                proof_tx: proof_tx.clone(),
            },
            ExecutionStatus::Executable { .. } => StatusKey::Executable,
            ExecutionStatus::Executing { execution_tx, .. } => StatusKey::Executing {
                execution_tx: execution_tx.clone(),
            },
            ExecutionStatus::Executed { execution_tx, .. } => StatusKey::Executed {
                execution_tx: execution_tx.clone(),
            },
            ExecutionStatus::Failed { reason, .. } => StatusKey::Failed {
                reason: reason.clone(),
            },
            ExecutionStatus::Expired { reason, .. } => StatusKey::Expired {
                reason: reason.clone(),
            },
        }
    }

}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteCapabilities {
    pub steps: Vec<String>,
    pub auto_relay: bool,
    pub manual_execute: bool,
    pub prove: bool,
    #[serde(default)]
    pub min_delay_ms: Option<u64>,
    #[serde(default)]
    pub max_window_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_key_ignores_timestamp() {
        let a = ExecutionStatus::Executable {
            at: SystemTime::UNIX_EPOCH,
        };
        let b = ExecutionStatus::Executable {
            at: SystemTime::now(),
        };
        assert_eq!(a.status_key(), b.status_key());
    }

    #[test]
    fn terminal_statuses() {
        assert!(
            ExecutionStatus::Executed {
                at: SystemTime::now(),
                execution_tx: None,
            }
            .is_terminal()
        );
        assert!(!ExecutionStatus::Executable {
            at: SystemTime::now(),
        }
        .is_terminal());
    }
}

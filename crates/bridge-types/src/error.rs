//! The bridge error taxonomy: one enum, carrying a code, an actionable
//! outcome, the lifecycle stage it occurred in, and optional route/chain
//! context. Chain- and engine-level failures funnel into this type at the
//! adapter boundary rather than leaking chain-specific error types upward.

use crate::chain_id::ChainId;
use crate::model::BridgeRoute;

/// What a caller should do in response to a [`BridgeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOutcome {
    /// The operation may succeed if retried, possibly after a delay.
    Retry,
    /// The caller's request or configuration needs to change.
    UserFix,
    /// The operation cannot succeed; the condition is permanent.
    Fatal,
}

/// Which lifecycle stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    Initiate,
    Prove,
    Execute,
    Monitor,
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("route {route:?} is not supported: no adapter, or it violates the hub invariant")]
    UnsupportedRoute { route: Option<BridgeRoute> },

    #[error("action is not supported for this route: {reason}")]
    UnsupportedAction {
        reason: String,
        route: Option<BridgeRoute>,
    },

    #[error("step is not applicable for this route: {step}")]
    UnsupportedStep {
        step: String,
        route: Option<BridgeRoute>,
    },

    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    #[error("RPC call failed: {reason}")]
    RpcError {
        reason: String,
        chain: Option<ChainId>,
        stage: ErrorStage,
    },

    #[error("operation timed out: {reason}")]
    Timeout { reason: String, stage: ErrorStage },

    #[error("destination-side recorded source height is behind the source log's block")]
    NotFinal {
        chain: Option<ChainId>,
        recorded_block: u64,
        log_block: u64,
    },

    #[error("no usable initiation event found: {reason}")]
    ProofNotAvailable { reason: String },

    #[error("prove was redundant for this message")]
    AlreadyProven { route: Option<BridgeRoute> },

    #[error("execute was attempted before prove")]
    NotProven { route: Option<BridgeRoute> },

    #[error("execute was redundant for this message")]
    AlreadyExecuted { route: Option<BridgeRoute> },

    #[error("destination call reverted during execute: {reason}")]
    ExecutionReverted {
        reason: String,
        route: Option<BridgeRoute>,
    },

    #[error("destination recorded a permanent failure for this message")]
    MessageFailed { route: Option<BridgeRoute> },

    #[error("invariant violated: {reason}")]
    InvariantViolation { reason: String, stage: ErrorStage },
}

impl BridgeError {
    /// A short, stable identifier for the variant, usable for matching in
    /// caller UX code without pattern-matching the whole enum.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::UnsupportedRoute { .. } => "UnsupportedRoute",
            BridgeError::UnsupportedAction { .. } => "UnsupportedAction",
            BridgeError::UnsupportedStep { .. } => "UnsupportedStep",
            BridgeError::ConfigError { .. } => "ConfigError",
            BridgeError::RpcError { .. } => "RpcError",
            BridgeError::Timeout { .. } => "Timeout",
            BridgeError::NotFinal { .. } => "NotFinal",
            BridgeError::ProofNotAvailable { .. } => "ProofNotAvailable",
            BridgeError::AlreadyProven { .. } => "AlreadyProven",
            BridgeError::NotProven { .. } => "NotProven",
            BridgeError::AlreadyExecuted { .. } => "AlreadyExecuted",
            BridgeError::ExecutionReverted { .. } => "ExecutionReverted",
            BridgeError::MessageFailed { .. } => "MessageFailed",
            BridgeError::InvariantViolation { .. } => "InvariantViolation",
        }
    }

    pub fn outcome(&self) -> ErrorOutcome {
        match self {
            BridgeError::RpcError { .. }
            | BridgeError::Timeout { .. }
            | BridgeError::NotFinal { .. } => ErrorOutcome::Retry,
            BridgeError::AlreadyProven { .. } | BridgeError::AlreadyExecuted { .. } => {
                ErrorOutcome::Retry
            }
            BridgeError::UnsupportedRoute { .. }
            | BridgeError::UnsupportedAction { .. }
            | BridgeError::UnsupportedStep { .. }
            | BridgeError::ConfigError { .. }
            | BridgeError::ProofNotAvailable { .. }
            | BridgeError::NotProven { .. } => ErrorOutcome::UserFix,
            BridgeError::ExecutionReverted { .. }
            | BridgeError::MessageFailed { .. }
            | BridgeError::InvariantViolation { .. } => ErrorOutcome::Fatal,
        }
    }

    pub fn stage(&self) -> ErrorStage {
        match self {
            BridgeError::UnsupportedRoute { .. }
            | BridgeError::UnsupportedAction { .. }
            | BridgeError::ConfigError { .. } => ErrorStage::Initiate,
            BridgeError::UnsupportedStep { step, .. } => match step.as_str() {
                "prove" => ErrorStage::Prove,
                "execute" => ErrorStage::Execute,
                "monitor" => ErrorStage::Monitor,
                _ => ErrorStage::Initiate,
            },
            BridgeError::RpcError { stage, .. } => *stage,
            BridgeError::Timeout { stage, .. } => *stage,
            BridgeError::NotFinal { .. } | BridgeError::ProofNotAvailable { .. } => {
                ErrorStage::Prove
            }
            BridgeError::AlreadyProven { .. } => ErrorStage::Prove,
            BridgeError::NotProven { .. }
            | BridgeError::AlreadyExecuted { .. }
            | BridgeError::ExecutionReverted { .. }
            | BridgeError::MessageFailed { .. } => ErrorStage::Execute,
            BridgeError::InvariantViolation { stage, .. } => *stage,
        }
    }

    pub fn route(&self) -> Option<&BridgeRoute> {
        match self {
            BridgeError::UnsupportedRoute { route }
            | BridgeError::UnsupportedAction { route, .. }
            | BridgeError::UnsupportedStep { route, .. }
            | BridgeError::AlreadyProven { route }
            | BridgeError::NotProven { route }
            | BridgeError::AlreadyExecuted { route }
            | BridgeError::ExecutionReverted { route, .. }
            | BridgeError::MessageFailed { route } => route.as_ref(),
            _ => None,
        }
    }

    /// Re-tags a chain-level error message that used an ambiguous substring
    /// (e.g. an on-chain program log) into a dedicated, typed variant. This
    /// mirrors how chain adapters only ever return generic RPC failures,
    /// while the engine/route-adapter layer recognizes protocol-specific
    /// phrasing and maps it onto the taxonomy above.
    pub fn from_chain_message(reason: &str, route: Option<BridgeRoute>) -> Self {
        let lower = reason.to_ascii_lowercase();
        if lower.contains("already executed") || lower.contains("alreadyexecuted") {
            BridgeError::AlreadyExecuted { route }
        } else if lower.contains("already proven") || lower.contains("alreadyproven") {
            BridgeError::AlreadyProven { route }
        } else if lower.contains("not proven") || lower.contains("notproven") {
            BridgeError::NotProven { route }
        } else {
            BridgeError::RpcError {
                reason: reason.to_string(),
                chain: None,
                stage: ErrorStage::Execute,
            }
        }
    }
}

//! The SVM→EVM route adapter: SVM-originated sends, executed on the EVM
//! hub once the relayer's validator approves them. No proof step — the
//! hub trusts the relayer's attestation rather than a Merkle proof, unlike
//! the reverse direction.

use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use bridge_codec::compute_outer_hash;
use bridge_engine_evm::{ApprovalOptions, ExecuteOutcome};
use bridge_engine_svm::{BridgeOpOptions, NestedCallSpec};
use bridge_types::{
    AssetRef, BridgeAction, BridgeError, BridgeRequest, BridgeRoute, ErrorStage, ExecutionStatus,
    MessageEndpointRef, MessageId, MessageRef, RelayMode, RouteCapabilities,
};

use crate::adapter::RouteAdapter;
use crate::token_mappings::TokenMappings;
use crate::util;

pub struct SvmToEvmRoute {
    route: BridgeRoute,
    svm_engine: Arc<bridge_engine_svm::SvmEngine>,
    evm_engine: Arc<bridge_engine_evm::EvmEngine>,
    token_mappings: Arc<TokenMappings>,
}

impl SvmToEvmRoute {
    pub fn new(
        route: BridgeRoute,
        svm_engine: Arc<bridge_engine_svm::SvmEngine>,
        evm_engine: Arc<bridge_engine_evm::EvmEngine>,
        token_mappings: Arc<TokenMappings>,
    ) -> Self {
        Self {
            route,
            svm_engine,
            evm_engine,
            token_mappings,
        }
    }

    fn build_opts(&self, request: &BridgeRequest, nested_call: Option<NestedCallSpec>) -> BridgeOpOptions {
        let relay = request.relay.clone().unwrap_or_default();
        BridgeOpOptions {
            pay_for_relay: relay.mode.unwrap_or(RelayMode::Auto) == RelayMode::Auto,
            nested_call,
            gas_limit: relay.gas_limit,
            idempotency_key: request.idempotency_key.clone(),
            payer: Default::default(),
        }
    }

    fn nested_call_spec(&self, call: &bridge_types::NestedCall) -> Result<NestedCallSpec, BridgeError> {
        let to = util::evm_address_to_svm_to(util::parse_evm_address(&call.to, &self.route)?);
        Ok(NestedCallSpec {
            call_type: call.call_type,
            to,
            value: call.value,
            data: call.data.clone(),
        })
    }

    async fn finalize_initiation(
        &self,
        outgoing_message_pda: solana_pubkey::Pubkey,
        signature: solana_signature::Signature,
    ) -> Result<MessageRef, BridgeError> {
        let outgoing = self
            .svm_engine
            .get_outgoing_message(&outgoing_message_pda)
            .await
            .map_err(|e| util::from_svm_err(e, &self.route, ErrorStage::Initiate))?;
        let outer_hash = compute_outer_hash(&outgoing);

        let mut derived = std::collections::HashMap::new();
        derived.insert("svmSignature".to_string(), signature.to_string());

        Ok(MessageRef {
            route: self.route.clone(),
            source: MessageEndpointRef {
                id: MessageId::SvmOutgoingMessagePda {
                    pda: outgoing_message_pda.to_string(),
                },
            },
            destination: Some(MessageEndpointRef {
                id: MessageId::EvmBridgeOuterHash {
                    hash: util::hex0x(outer_hash.as_slice()),
                },
            }),
            derived,
        })
    }
}

#[async_trait]
impl RouteAdapter for SvmToEvmRoute {
    fn capabilities(&self) -> RouteCapabilities {
        RouteCapabilities {
            steps: vec!["initiate".to_string(), "execute".to_string(), "monitor".to_string()],
            auto_relay: true,
            manual_execute: self.evm_engine.has_signer(),
            prove: false,
            min_delay_ms: None,
            max_window_ms: None,
        }
    }

    async fn initiate(&self, request: &BridgeRequest) -> Result<MessageRef, BridgeError> {
        #[cfg(feature = "telemetry")]
        tracing::info!(
            route = %format!("{} -> {}", self.route.source_chain, self.route.destination_chain),
            "svm_to_evm: initiate"
        );
        match &request.action {
            BridgeAction::Transfer { asset, amount, recipient, call } => {
                let to = util::evm_address_to_svm_to(util::parse_evm_address(recipient, &self.route)?);
                let nested_call = call.as_ref().map(|c| self.nested_call_spec(c)).transpose()?;
                let opts = self.build_opts(request, nested_call);

                let initiated = match asset {
                    AssetRef::Native => self
                        .svm_engine
                        .bridge_native(to, *amount, opts)
                        .await
                        .map_err(|e| util::from_svm_err(e, &self.route, ErrorStage::Initiate))?,
                    AssetRef::Token { address } => {
                        let remote_token_hex = self
                            .token_mappings
                            .lookup(&self.route.source_chain, &self.route.destination_chain, address)
                            .ok_or_else(|| BridgeError::UnsupportedAction {
                                reason: format!("no token mapping registered for mint {address}"),
                                route: Some(self.route.clone()),
                            })?;
                        let mint = util::parse_svm_pubkey(address, &self.route)?;
                        let remote_token =
                            util::evm_address_to_svm_to(util::parse_evm_address(remote_token_hex, &self.route)?);
                        self.svm_engine
                            .bridge_token(to, mint, remote_token, *amount, opts)
                            .await
                            .map_err(|e| util::from_svm_err(e, &self.route, ErrorStage::Initiate))?
                    }
                    AssetRef::Wrapped { address } => {
                        let mint = util::parse_svm_pubkey(address, &self.route)?;
                        self.svm_engine
                            .bridge_wrapped(to, mint, *amount, opts)
                            .await
                            .map_err(|e| util::from_svm_err(e, &self.route, ErrorStage::Initiate))?
                    }
                };
                self.finalize_initiation(initiated.outgoing_message_pda, initiated.signature).await
            }
            BridgeAction::Call { to, value, data, call_type } => {
                let to32 = util::evm_address_to_svm_to(util::parse_evm_address(to, &self.route)?);
                let opts = self.build_opts(request, None);
                let initiated = self
                    .svm_engine
                    .bridge_call(to32, *value, data.clone(), *call_type, opts)
                    .await
                    .map_err(|e| util::from_svm_err(e, &self.route, ErrorStage::Initiate))?;
                self.finalize_initiation(initiated.outgoing_message_pda, initiated.signature).await
            }
        }
    }

    async fn prove(&self, _message: &MessageRef) -> Result<MessageRef, BridgeError> {
        Err(BridgeError::UnsupportedStep {
            step: "prove".to_string(),
            route: Some(self.route.clone()),
        })
    }

    async fn execute(&self, message: &MessageRef) -> Result<MessageRef, BridgeError> {
        let destination = message.destination.as_ref().ok_or_else(|| BridgeError::ProofNotAvailable {
            reason: "message ref has no evm:bridgeOuterHash destination to execute against".to_string(),
        })?;
        let MessageId::SvmOutgoingMessagePda { pda } = &message.source.id else {
            return Err(util::invariant(
                "SVM->EVM execute requires an svm:outgoingMessagePda source identity",
                ErrorStage::Execute,
            ));
        };
        let outgoing_message_pda = util::parse_svm_pubkey(pda, &self.route)?;
        let outgoing = self
            .svm_engine
            .get_outgoing_message(&outgoing_message_pda)
            .await
            .map_err(|e| util::from_svm_err(e, &self.route, ErrorStage::Execute))?;

        let outcome = self
            .evm_engine
            .execute_message(&outgoing, None, ApprovalOptions::default())
            .await
            .map_err(|e| util::from_evm_err(e, &self.route, ErrorStage::Execute))?;

        let tx_hash = match outcome {
            ExecuteOutcome::Submitted(hash) => hash,
            ExecuteOutcome::AlreadyExecuted(hash) => hash,
        };

        let mut derived = message.derived.clone();
        derived.insert("executionTx".to_string(), util::hex0x(tx_hash.as_slice()));
        Ok(MessageRef {
            route: self.route.clone(),
            source: message.source.clone(),
            destination: Some(destination.clone()),
            derived,
        })
    }

    async fn status(&self, message: &MessageRef) -> Result<ExecutionStatus, BridgeError> {
        let at = SystemTime::now();
        let Some(destination) = &message.destination else {
            return Ok(ExecutionStatus::Unknown { at });
        };
        let MessageId::EvmBridgeOuterHash { hash } = &destination.id else {
            return Ok(ExecutionStatus::Unknown { at });
        };
        let outer_hash = util::parse_hex32(hash, &self.route)?;
        let (succeeded, failed) = self
            .evm_engine
            .read_status(outer_hash.into())
            .await
            .map_err(|e| util::from_evm_err(e, &self.route, ErrorStage::Monitor))?;

        Ok(if succeeded {
            ExecutionStatus::Executed {
                at,
                execution_tx: message.derived.get("executionTx").cloned(),
            }
        } else if failed {
            ExecutionStatus::Failed {
                at,
                reason: "destination recorded a permanent failure".to_string(),
                execution_tx: None,
            }
        } else {
            ExecutionStatus::Executable { at }
        })
    }
}

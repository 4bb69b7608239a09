//! The EVM→SVM route adapter: EVM-originated token transfers, proven via
//! a Merkle-style proof read off the bridge contract and executed as an
//! SVM relay instruction. Unlike the reverse direction, this one has a
//! real proof step — the SVM side trusts a proof against the hub's
//! recorded block height rather than a relayer attestation.

use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use bridge_engine_svm::{BridgeOpOptions, IncomingMessageStatus};
use bridge_types::{
    AssetRef, BridgeAction, BridgeError, BridgeRequest, BridgeRoute, ErrorStage, ExecutionStatus,
    MessageEndpointRef, MessageId, MessageRef, RouteCapabilities,
};

use crate::adapter::RouteAdapter;
use crate::token_mappings::TokenMappings;
use crate::util;

pub struct EvmToSvmRoute {
    route: BridgeRoute,
    evm_engine: Arc<bridge_engine_evm::EvmEngine>,
    svm_engine: Arc<bridge_engine_svm::SvmEngine>,
    token_mappings: Arc<TokenMappings>,
}

impl EvmToSvmRoute {
    pub fn new(
        route: BridgeRoute,
        evm_engine: Arc<bridge_engine_evm::EvmEngine>,
        svm_engine: Arc<bridge_engine_svm::SvmEngine>,
        token_mappings: Arc<TokenMappings>,
    ) -> Self {
        Self {
            route,
            evm_engine,
            svm_engine,
            token_mappings,
        }
    }
}

#[async_trait]
impl RouteAdapter for EvmToSvmRoute {
    fn capabilities(&self) -> RouteCapabilities {
        RouteCapabilities {
            steps: vec![
                "initiate".to_string(),
                "prove".to_string(),
                "execute".to_string(),
                "monitor".to_string(),
            ],
            auto_relay: false,
            manual_execute: true,
            prove: true,
            min_delay_ms: None,
            max_window_ms: None,
        }
    }

    async fn initiate(&self, request: &BridgeRequest) -> Result<MessageRef, BridgeError> {
        #[cfg(feature = "telemetry")]
        tracing::info!(
            route = %format!("{} -> {}", self.route.source_chain, self.route.destination_chain),
            "evm_to_svm: initiate"
        );
        let BridgeAction::Transfer {
            asset, amount, recipient, call,
        } = &request.action
        else {
            return Err(BridgeError::UnsupportedAction {
                reason: "EVM->SVM only supports token transfers, not arbitrary calls".to_string(),
                route: Some(self.route.clone()),
            });
        };
        if call.is_some() {
            return Err(BridgeError::UnsupportedAction {
                reason: "EVM->SVM transfers cannot carry a nested call".to_string(),
                route: Some(self.route.clone()),
            });
        }
        let AssetRef::Token { address: local_token } = asset else {
            return Err(BridgeError::UnsupportedAction {
                reason: "EVM->SVM only supports ERC20 token transfers with a registered mapping".to_string(),
                route: Some(self.route.clone()),
            });
        };

        let remote_mint = self
            .token_mappings
            .lookup(&self.route.source_chain, &self.route.destination_chain, local_token)
            .ok_or_else(|| BridgeError::UnsupportedAction {
                reason: format!("no token mapping registered for ERC20 {local_token}"),
                route: Some(self.route.clone()),
            })?;

        let local_token_addr = util::parse_evm_address(local_token, &self.route)?;
        let mint = util::parse_svm_pubkey(remote_mint, &self.route)?;
        let remote_token: [u8; 32] = mint.to_bytes();
        let to = util::parse_svm_pubkey(recipient, &self.route)?;
        let to_bytes: [u8; 32] = to.to_bytes();

        let tx_hash = self
            .evm_engine
            .bridge_token(local_token_addr, remote_token.into(), to_bytes.into(), *amount, vec![])
            .await
            .map_err(|e| util::from_evm_err(e, &self.route, ErrorStage::Initiate))?;

        let receipt = self
            .evm_engine
            .transaction_receipt(tx_hash)
            .await
            .map_err(|e| util::from_evm_err(e, &self.route, ErrorStage::Initiate))?
            .ok_or_else(|| BridgeError::RpcError {
                reason: format!("transaction {tx_hash} submitted but its receipt is not yet available"),
                chain: Some(self.route.source_chain.clone()),
                stage: ErrorStage::Initiate,
            })?;
        let event = bridge_engine_evm::decode_message_initiated(receipt.inner.logs(), tx_hash)
            .map_err(|e| util::from_evm_err(e, &self.route, ErrorStage::Initiate))?;

        let mut derived = std::collections::HashMap::new();
        derived.insert("txHash".to_string(), util::hex0x(tx_hash.as_slice()));
        derived.insert("nonce".to_string(), event.nonce.to_string());
        derived.insert("mmrRoot".to_string(), util::hex0x(&event.mmr_root));

        Ok(MessageRef {
            route: self.route.clone(),
            source: MessageEndpointRef {
                id: MessageId::EvmMessageHash {
                    hash: util::hex0x(&event.message_hash),
                },
            },
            destination: None,
            derived,
        })
    }

    async fn prove(&self, message: &MessageRef) -> Result<MessageRef, BridgeError> {
        let MessageId::EvmMessageHash { hash } = &message.source.id else {
            return Err(util::invariant(
                "EVM->SVM prove requires an evm:messageHash source identity",
                ErrorStage::Prove,
            ));
        };
        let message_hash = util::parse_hex32(hash, &self.route)?;
        let tx_hash_hex = message.derived.get("txHash").ok_or_else(|| BridgeError::ProofNotAvailable {
            reason: "message ref has no derived txHash to prove against".to_string(),
        })?;
        let tx_hash_bytes = util::parse_hex32(tx_hash_hex, &self.route)?;
        let tx_hash = tx_hash_bytes.into();

        let block_number = match message.derived.get("blockNumberHint") {
            Some(hint) => hint.parse::<u64>().map_err(|e| BridgeError::UnsupportedAction {
                reason: format!("invalid blockNumberHint `{hint}`: {e}"),
                route: Some(self.route.clone()),
            })?,
            None => self
                .svm_engine
                .latest_destination_block_number()
                .await
                .map_err(|e| util::from_svm_err(e, &self.route, ErrorStage::Prove))?,
        };

        let (event, proof) = self
            .evm_engine
            .generate_proof(tx_hash, block_number)
            .await
            .map_err(|e| util::from_evm_err(e, &self.route, ErrorStage::Prove))?;

        if event.message_hash != message_hash {
            return Err(util::invariant(
                "proved event's message hash does not match the message ref's source identity",
                ErrorStage::Prove,
            ));
        }

        let result = self
            .svm_engine
            .prove_incoming_message(&event, proof, block_number, BridgeOpOptions::default())
            .await
            .map_err(|e| util::from_svm_err(e, &self.route, ErrorStage::Prove))?;

        let mut derived = message.derived.clone();
        if let Some(signature) = result.signature {
            derived.insert("proveSignature".to_string(), signature.to_string());
        }

        Ok(MessageRef {
            route: self.route.clone(),
            source: message.source.clone(),
            destination: Some(MessageEndpointRef {
                id: MessageId::SvmIncomingMessagePda {
                    pda: result.pda.to_string(),
                },
            }),
            derived,
        })
    }

    async fn execute(&self, message: &MessageRef) -> Result<MessageRef, BridgeError> {
        let MessageId::EvmMessageHash { hash } = &message.source.id else {
            return Err(util::invariant(
                "EVM->SVM execute requires an evm:messageHash source identity",
                ErrorStage::Execute,
            ));
        };
        let message_hash = util::parse_hex32(hash, &self.route)?;
        let opts = BridgeOpOptions::default();

        let signature = self
            .svm_engine
            .execute_incoming_message(message_hash, opts)
            .await
            .map_err(|e| util::from_svm_err(e, &self.route, ErrorStage::Execute))?;

        let mut derived = message.derived.clone();
        derived.insert("executionSignature".to_string(), signature.to_string());

        Ok(MessageRef {
            route: self.route.clone(),
            source: message.source.clone(),
            destination: message.destination.clone(),
            derived,
        })
    }

    async fn status(&self, message: &MessageRef) -> Result<ExecutionStatus, BridgeError> {
        let at = SystemTime::now();
        let MessageId::EvmMessageHash { hash } = &message.source.id else {
            return Ok(ExecutionStatus::Unknown { at });
        };
        let message_hash = util::parse_hex32(hash, &self.route)?;

        let status = self
            .svm_engine
            .incoming_message_status(message_hash)
            .await
            .map_err(|e| util::from_svm_err(e, &self.route, ErrorStage::Monitor))?;

        Ok(match status {
            IncomingMessageStatus::Absent => ExecutionStatus::Initiated {
                at,
                source_tx: message.derived.get("txHash").cloned(),
            },
            IncomingMessageStatus::Proven => ExecutionStatus::Executable { at },
            IncomingMessageStatus::Executed => ExecutionStatus::Executed {
                at,
                execution_tx: message.derived.get("executionSignature").cloned(),
            },
        })
    }
}

//! The SVM source engine: builds and submits SVM-originated bridge sends,
//! and drives the prove+execute terminal steps for EVM→SVM messages.
//! Every initiating operation follows the same skeleton described in the
//! spec: derive a salt, resolve the payer, build instructions, optionally
//! append a pay-for-relay instruction, submit with confirmed commitment.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bridge_chain_svm::SvmChainProvider;
use bridge_codec::{MessageInitiatedEvent, OutgoingMessage};
use solana_compute_budget_interface::ComputeBudgetInstruction;
use solana_instruction::Instruction;
use solana_keypair::Keypair;
use solana_message::{VersionedMessage, v0::Message as MessageV0};
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_transaction::versioned::VersionedTransaction;

use crate::error::SvmEngineError;
use crate::keypair_cache::KeypairCache;
use crate::pda;
use crate::program::{self, IncomingMessageAccount};
use crate::salt::resolve_salt;

const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);

/// Where a per-call payer signer comes from. Most calls use the chain
/// adapter's bound keypair; an explicit path lets a caller fee-pay from a
/// different signer without re-configuring the whole adapter.
#[derive(Debug, Clone, Default)]
pub enum PayerSource {
    #[default]
    Bound,
    Path(PathBuf),
}

#[derive(Debug, Clone, Default)]
pub struct NestedCallSpec {
    pub call_type: u8,
    pub to: [u8; 32],
    pub value: u128,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct BridgeOpOptions {
    pub pay_for_relay: bool,
    pub nested_call: Option<NestedCallSpec>,
    pub gas_limit: Option<u64>,
    pub idempotency_key: Option<String>,
    pub payer: PayerSource,
}

#[derive(Debug, Clone)]
pub struct InitiatedMessage {
    pub outgoing_message_pda: Pubkey,
    pub signature: Signature,
}

#[derive(Debug, Clone)]
pub struct ProveResult {
    pub signature: Option<Signature>,
    pub message_hash: [u8; 32],
    pub pda: Pubkey,
}

/// Where an incoming (EVM→SVM) message sits in its terminal lifecycle,
/// used by the EVM→SVM route adapter's `status` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomingMessageStatus {
    /// No incoming message PDA exists yet: not proven.
    Absent,
    /// Proven but not yet executed.
    Proven,
    /// Proven and executed.
    Executed,
}

pub struct SvmEngineConfig {
    pub bridge_program: Pubkey,
    pub relayer_program: Pubkey,
}

pub struct SvmEngine {
    chain: Arc<SvmChainProvider>,
    bridge_program: Pubkey,
    relayer_program: Pubkey,
    keypair_cache: KeypairCache,
}

impl SvmEngine {
    pub fn new(chain: Arc<SvmChainProvider>, config: SvmEngineConfig) -> Self {
        Self {
            chain,
            bridge_program: config.bridge_program,
            relayer_program: config.relayer_program,
            keypair_cache: KeypairCache::new(),
        }
    }

    fn resolve_payer(&self, source: &PayerSource) -> Result<Arc<Keypair>, SvmEngineError> {
        match source {
            PayerSource::Bound => Ok(Arc::clone(self.chain.keypair())),
            PayerSource::Path(path) => self.keypair_cache.load(path),
        }
    }

    async fn submit(
        &self,
        payer: &Keypair,
        mut instructions: Vec<Instruction>,
    ) -> Result<Signature, SvmEngineError> {
        let blockhash = self.chain.latest_blockhash().await?;
        let mut prefixed = vec![
            ComputeBudgetInstruction::set_compute_unit_limit(self.chain.max_compute_unit_limit()),
            ComputeBudgetInstruction::set_compute_unit_price(self.chain.max_compute_unit_price()),
        ];
        prefixed.append(&mut instructions);

        let message = MessageV0::try_compile(&payer.pubkey(), &prefixed, &[], blockhash)
            .map_err(|e| SvmEngineError::Base58(format!("failed to compile message: {e}")))?;
        let mut tx = VersionedTransaction {
            signatures: vec![Signature::default(); message.header.num_required_signatures as usize],
            message: VersionedMessage::V0(message),
        };
        let signature = payer.sign_message(&tx.message.serialize());
        tx.signatures[0] = signature;

        self.chain
            .send_and_confirm(&tx, DEFAULT_CONFIRM_TIMEOUT)
            .await
            .map_err(SvmEngineError::from)
    }

    fn maybe_pay_for_relay(
        &self,
        payer: &Pubkey,
        opts: &BridgeOpOptions,
        gas_limit: u64,
    ) -> Option<Instruction> {
        if !opts.pay_for_relay {
            return None;
        }
        let relay_salt = resolve_salt(None);
        let (relay_metering, _) = pda::relay_metering_pda(&self.relayer_program, &relay_salt);
        Some(program::pay_for_relay_instruction(
            &self.relayer_program,
            &relay_metering,
            payer,
            relay_salt,
            gas_limit,
        ))
    }

    pub async fn bridge_native(
        &self,
        to: [u8; 32],
        amount: u64,
        opts: BridgeOpOptions,
    ) -> Result<InitiatedMessage, SvmEngineError> {
        let payer = self.resolve_payer(&opts.payer)?;
        let salt = resolve_salt(opts.idempotency_key.as_deref());
        let (outgoing_message, _) = pda::outgoing_message_pda(&self.bridge_program, &salt);
        let (sol_vault, _) = pda::sol_vault_pda(&self.bridge_program);
        let gas_limit = opts.gas_limit.unwrap_or(0);

        let mut instructions = vec![program::bridge_native_instruction(
            &self.bridge_program,
            &outgoing_message,
            &sol_vault,
            &payer.pubkey(),
            salt,
            to,
            amount,
            gas_limit,
            opts.nested_call
                .as_ref()
                .map(|c| (c.call_type, c.to, c.value, c.data.clone())),
        )];
        if let Some(ix) = self.maybe_pay_for_relay(&payer.pubkey(), &opts, gas_limit) {
            instructions.push(ix);
        }

        let signature = self.submit(&payer, instructions).await?;
        #[cfg(feature = "telemetry")]
        tracing::info!(
            outgoing_message = %outgoing_message,
            signature = %signature,
            amount,
            "bridgeNative submitted"
        );
        Ok(InitiatedMessage {
            outgoing_message_pda: outgoing_message,
            signature,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn bridge_token(
        &self,
        to: [u8; 32],
        mint: Pubkey,
        remote_token: [u8; 32],
        amount: u64,
        opts: BridgeOpOptions,
    ) -> Result<InitiatedMessage, SvmEngineError> {
        let payer = self.resolve_payer(&opts.payer)?;
        let salt = resolve_salt(opts.idempotency_key.as_deref());
        let (outgoing_message, _) = pda::outgoing_message_pda(&self.bridge_program, &salt);
        let (token_vault, _) = pda::token_vault_pda(&self.bridge_program, &mint, &remote_token);
        let gas_limit = opts.gas_limit.unwrap_or(0);

        let mut instructions = vec![program::bridge_token_instruction(
            &self.bridge_program,
            &outgoing_message,
            &token_vault,
            &mint,
            &payer.pubkey(),
            salt,
            to,
            remote_token,
            amount,
            gas_limit,
            opts.nested_call
                .as_ref()
                .map(|c| (c.call_type, c.to, c.value, c.data.clone())),
        )];
        if let Some(ix) = self.maybe_pay_for_relay(&payer.pubkey(), &opts, gas_limit) {
            instructions.push(ix);
        }

        let signature = self.submit(&payer, instructions).await?;
        Ok(InitiatedMessage {
            outgoing_message_pda: outgoing_message,
            signature,
        })
    }

    pub async fn bridge_wrapped(
        &self,
        to: [u8; 32],
        mint: Pubkey,
        amount: u64,
        opts: BridgeOpOptions,
    ) -> Result<InitiatedMessage, SvmEngineError> {
        let payer = self.resolve_payer(&opts.payer)?;
        let salt = resolve_salt(opts.idempotency_key.as_deref());
        let (outgoing_message, _) = pda::outgoing_message_pda(&self.bridge_program, &salt);
        // A wrapped token's own mint stands in for the `remoteToken` seed
        // component: the vault is per-(mint, remote identity) the same as
        // a native SPL token bridge.
        let remote_token = mint.to_bytes();
        let (token_vault, _) = pda::token_vault_pda(&self.bridge_program, &mint, &remote_token);
        let gas_limit = opts.gas_limit.unwrap_or(0);

        let mut instructions = vec![program::bridge_wrapped_instruction(
            &self.bridge_program,
            &outgoing_message,
            &token_vault,
            &mint,
            &payer.pubkey(),
            salt,
            to,
            remote_token,
            amount,
            gas_limit,
        )];
        if let Some(ix) = self.maybe_pay_for_relay(&payer.pubkey(), &opts, gas_limit) {
            instructions.push(ix);
        }

        let signature = self.submit(&payer, instructions).await?;
        Ok(InitiatedMessage {
            outgoing_message_pda: outgoing_message,
            signature,
        })
    }

    pub async fn bridge_call(
        &self,
        to: [u8; 32],
        value: u128,
        data: Vec<u8>,
        call_type: u8,
        opts: BridgeOpOptions,
    ) -> Result<InitiatedMessage, SvmEngineError> {
        let payer = self.resolve_payer(&opts.payer)?;
        let salt = resolve_salt(opts.idempotency_key.as_deref());
        let (outgoing_message, _) = pda::outgoing_message_pda(&self.bridge_program, &salt);
        let gas_limit = opts.gas_limit.unwrap_or(0);

        let mut instructions = vec![program::bridge_call_instruction(
            &self.bridge_program,
            &outgoing_message,
            &payer.pubkey(),
            salt,
            to,
            value,
            data,
            call_type,
            gas_limit,
        )];
        if let Some(ix) = self.maybe_pay_for_relay(&payer.pubkey(), &opts, gas_limit) {
            instructions.push(ix);
        }

        let signature = self.submit(&payer, instructions).await?;
        Ok(InitiatedMessage {
            outgoing_message_pda: outgoing_message,
            signature,
        })
    }

    /// Creates a wrapped-token mint whose identity is deterministically
    /// derived from `(decimals, keccak(metadata blob))`. Returns the
    /// derived mint address alongside the submission signature.
    pub async fn wrap_token_metadata(
        &self,
        remote_token: [u8; 20],
        name: String,
        symbol: String,
        decimals: u8,
        scaler_exponent: i8,
        opts: BridgeOpOptions,
    ) -> Result<(Pubkey, Signature), SvmEngineError> {
        let payer = self.resolve_payer(&opts.payer)?;
        let wrapped_id =
            bridge_codec::wrapped_token_id(&remote_token, &name, &symbol, decimals, scaler_exponent);
        let (mint, _) = pda::wrapped_token_pda(&self.bridge_program, &wrapped_id.0);

        let instructions = vec![program::wrap_token_metadata_instruction(
            &self.bridge_program,
            &mint,
            &payer.pubkey(),
            remote_token,
            name,
            symbol,
            decimals,
            scaler_exponent,
        )];
        let signature = self.submit(&payer, instructions).await?;
        Ok((mint, signature))
    }

    /// Re-fetches a just-initiated outgoing message account by its PDA,
    /// used by the SVM→EVM route adapter to derive the EVM outer hash once
    /// the account exists.
    pub async fn get_outgoing_message(
        &self,
        outgoing_message_pda: &Pubkey,
    ) -> Result<OutgoingMessage, SvmEngineError> {
        let account = self
            .chain
            .get_account(outgoing_message_pda)
            .await?
            .ok_or(SvmEngineError::OutgoingMessageNotFound(*outgoing_message_pda))?;
        let decoded = program::OutgoingMessageAccount::decode(&account.data)
            .map_err(|e| SvmEngineError::MalformedAccount(*outgoing_message_pda, e.to_string()))?;
        Ok(OutgoingMessage {
            nonce: decoded.nonce,
            sender: decoded.sender,
            ty: decoded.ty,
            data: decoded.data,
            outgoing_message_pubkey: outgoing_message_pda.to_bytes(),
            gas_limit: decoded.gas_limit,
        })
    }

    /// Reads the bridge state account's recorded hub block height, used by
    /// the EVM→SVM route adapter to decide prove readiness.
    pub async fn latest_destination_block_number(&self) -> Result<u64, SvmEngineError> {
        let (bridge_state, _) = pda::bridge_state_pda(&self.bridge_program);
        let account = self
            .chain
            .get_account(&bridge_state)
            .await?
            .ok_or(SvmEngineError::BridgeStateNotFound(bridge_state))?;
        let state = program::BridgeStateAccount::decode(&account.data)
            .map_err(|e| SvmEngineError::MalformedAccount(bridge_state, e.to_string()))?;
        Ok(state.latest_hub_block_number)
    }

    /// Idempotent: if the incoming message PDA already exists, the prove
    /// submission is skipped and only the (already-known) hash is
    /// returned.
    pub async fn prove_incoming_message(
        &self,
        event: &MessageInitiatedEvent,
        proof: Vec<[u8; 32]>,
        block_number: u64,
        opts: BridgeOpOptions,
    ) -> Result<ProveResult, SvmEngineError> {
        let (incoming_message, _) =
            pda::incoming_message_pda(&self.bridge_program, &event.message_hash);

        if self.chain.get_account(&incoming_message).await?.is_some() {
            #[cfg(feature = "telemetry")]
            tracing::info!(pda = %incoming_message, "proveIncomingMessage: already proven, skipping submission");
            return Ok(ProveResult {
                signature: None,
                message_hash: event.message_hash,
                pda: incoming_message,
            });
        }

        let payer = self.resolve_payer(&opts.payer)?;
        let sender: [u8; 20] = bridge_codec::first_bytes20(&event.sender).into_array();
        let instructions = vec![program::prove_incoming_message_instruction(
            &self.bridge_program,
            &incoming_message,
            &payer.pubkey(),
            event.message_hash,
            event.nonce,
            sender,
            event.ty,
            event.data.clone(),
            proof,
            block_number,
        )];
        let signature = self.submit(&payer, instructions).await?;
        #[cfg(feature = "telemetry")]
        tracing::info!(pda = %incoming_message, signature = %signature, "proveIncomingMessage submitted");
        Ok(ProveResult {
            signature: Some(signature),
            message_hash: event.message_hash,
            pda: incoming_message,
        })
    }

    /// Reads whether an incoming message PDA exists and, if so, whether it
    /// has been executed. Does not distinguish "not proven" from "never
    /// will be" — absence is always reported as [`IncomingMessageStatus::Absent`].
    pub async fn incoming_message_status(
        &self,
        message_hash: [u8; 32],
    ) -> Result<IncomingMessageStatus, SvmEngineError> {
        let (incoming_message, _) = pda::incoming_message_pda(&self.bridge_program, &message_hash);
        let Some(account) = self.chain.get_account(&incoming_message).await? else {
            return Ok(IncomingMessageStatus::Absent);
        };
        let decoded = IncomingMessageAccount::decode(&account.data)
            .map_err(|e| SvmEngineError::MalformedAccount(incoming_message, e.to_string()))?;
        Ok(if decoded.executed {
            IncomingMessageStatus::Executed
        } else {
            IncomingMessageStatus::Proven
        })
    }

    /// Walks the stored incoming message, reconstructs the remaining
    /// accounts the on-chain relay instruction needs (downgrading the
    /// bridge CPI authority's write flag), and submits one `relayMessage`
    /// instruction.
    pub async fn execute_incoming_message(
        &self,
        message_hash: [u8; 32],
        opts: BridgeOpOptions,
    ) -> Result<Signature, SvmEngineError> {
        let (incoming_message, _) = pda::incoming_message_pda(&self.bridge_program, &message_hash);
        let account = self
            .chain
            .get_account(&incoming_message)
            .await?
            .ok_or_else(|| SvmEngineError::NotProven(hex::encode(message_hash)))?;
        let decoded = IncomingMessageAccount::decode(&account.data)
            .map_err(|e| SvmEngineError::MalformedAccount(incoming_message, e.to_string()))?;
        if decoded.executed {
            return Err(SvmEngineError::AlreadyExecuted(hex::encode(message_hash)));
        }

        let payer = self.resolve_payer(&opts.payer)?;
        let remaining = decoded.remaining_accounts_for_relay();
        let instructions = vec![program::relay_message_instruction(
            &self.bridge_program,
            &incoming_message,
            &payer.pubkey(),
            message_hash,
            &remaining,
        )];
        self.submit(&payer, instructions).await
    }
}

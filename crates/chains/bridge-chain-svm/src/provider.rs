//! The SVM chain adapter: reads, PDA derivation, and keypair-backed
//! transaction submission. Trimmed to a single bound signer per chain
//! (the engines' `KeypairCache` handles alternate per-operation payers).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bridge_types::adapter::{ChainAdapter, ChainKind, FromConfig};
use bridge_types::ChainId;
use solana_account::Account;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_commitment_config::CommitmentConfig;
use solana_hash::Hash;
use solana_keypair::Keypair;
use solana_message::VersionedMessage;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_transaction::versioned::VersionedTransaction;

use crate::config::{KeypairSource, SvmChainConfig};
use crate::error::SvmChainProviderError;

pub struct SvmChainProvider {
    chain: ChainId,
    keypair: Arc<Keypair>,
    rpc_client: Arc<RpcClient>,
    max_compute_unit_limit: u32,
    max_compute_unit_price: u64,
}

impl std::fmt::Debug for SvmChainProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvmChainProvider")
            .field("chain", &self.chain)
            .field("pubkey", &self.keypair.pubkey())
            .finish()
    }
}

fn load_keypair(source: &KeypairSource) -> Result<Keypair, SvmChainProviderError> {
    match source {
        KeypairSource::Inline { keypair } => {
            let bytes = bs58::decode(keypair.0.to_string())
                .into_vec()
                .map_err(|e| SvmChainProviderError::InvalidKeypair(e.to_string()))?;
            Keypair::from_bytes(&bytes)
                .map_err(|e| SvmChainProviderError::InvalidKeypair(e.to_string()))
        }
        KeypairSource::Path { path } => {
            let raw = std::fs::read_to_string(path).map_err(|e| SvmChainProviderError::KeypairFile {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            let bytes: Vec<u8> = serde_json::from_str(&raw).map_err(|e| {
                SvmChainProviderError::KeypairFile {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?;
            Keypair::from_bytes(&bytes)
                .map_err(|e| SvmChainProviderError::InvalidKeypair(e.to_string()))
        }
    }
}

#[async_trait]
impl FromConfig<SvmChainConfig> for SvmChainProvider {
    type Error = SvmChainProviderError;

    async fn from_config(config: &SvmChainConfig) -> Result<Self, Self::Error> {
        let chain = ChainId::new("solana", config.chain_reference.clone());
        let keypair = load_keypair(&config.keypair)?;
        let rpc_client = RpcClient::new_with_commitment(
            config.rpc.http.to_string(),
            CommitmentConfig::confirmed(),
        );
        Ok(Self {
            chain,
            keypair: Arc::new(keypair),
            rpc_client: Arc::new(rpc_client),
            max_compute_unit_limit: config.max_compute_unit_limit,
            max_compute_unit_price: config.max_compute_unit_price,
        })
    }
}

impl ChainAdapter for SvmChainProvider {
    fn kind(&self) -> ChainKind {
        ChainKind::Svm
    }

    fn chain_id(&self) -> &ChainId {
        &self.chain
    }
}

impl SvmChainProvider {
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn keypair(&self) -> &Arc<Keypair> {
        &self.keypair
    }

    pub fn rpc_client(&self) -> &Arc<RpcClient> {
        &self.rpc_client
    }

    pub fn max_compute_unit_limit(&self) -> u32 {
        self.max_compute_unit_limit
    }

    pub fn max_compute_unit_price(&self) -> u64 {
        self.max_compute_unit_price
    }

    /// Derives `(pda, bump)` from a program id and an ordered seed list.
    pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(seeds, program_id)
    }

    pub async fn latest_blockhash(&self) -> Result<Hash, SvmChainProviderError> {
        self.rpc_client
            .get_latest_blockhash()
            .await
            .map_err(|e| SvmChainProviderError::Rpc(e.to_string()))
    }

    pub async fn get_account(
        &self,
        pubkey: &Pubkey,
    ) -> Result<Option<Account>, SvmChainProviderError> {
        match self.rpc_client.get_account(pubkey).await {
            Ok(account) => Ok(Some(account)),
            Err(err) => {
                if err.to_string().contains("AccountNotFound") {
                    Ok(None)
                } else {
                    Err(SvmChainProviderError::Rpc(err.to_string()))
                }
            }
        }
    }

    pub async fn get_multiple_accounts(
        &self,
        pubkeys: &[Pubkey],
    ) -> Result<Vec<Option<Account>>, SvmChainProviderError> {
        self.rpc_client
            .get_multiple_accounts(pubkeys)
            .await
            .map_err(|e| SvmChainProviderError::Rpc(e.to_string()))
    }

    /// Places this adapter's signature at the position its pubkey occupies
    /// among the message's static account keys.
    pub fn sign(&self, transaction: &mut VersionedTransaction) -> Result<(), SvmChainProviderError> {
        let account_keys = match &transaction.message {
            VersionedMessage::Legacy(m) => &m.account_keys,
            VersionedMessage::V0(m) => &m.account_keys,
        };
        let position = account_keys
            .iter()
            .position(|key| *key == self.keypair.pubkey())
            .ok_or_else(|| SvmChainProviderError::SignerNotFound(self.keypair.pubkey()))?;
        let message_bytes = transaction.message.serialize();
        let signature = self.keypair.sign_message(&message_bytes);
        transaction.signatures[position] = signature;
        Ok(())
    }

    /// Submits a transaction already containing this adapter's signature
    /// and waits for confirmed commitment, polling on a fixed interval.
    pub async fn send_and_confirm(
        &self,
        transaction: &VersionedTransaction,
        timeout: Duration,
    ) -> Result<Signature, SvmChainProviderError> {
        let signature = self
            .rpc_client
            .send_transaction_with_config(
                transaction,
                RpcSendTransactionConfig {
                    skip_preflight: true,
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| SvmChainProviderError::Rpc(e.to_string()))?;

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let confirmed = self
                .rpc_client
                .confirm_transaction_with_commitment(&signature, CommitmentConfig::confirmed())
                .await
                .map_err(|e| SvmChainProviderError::Rpc(e.to_string()))?;
            if confirmed.value {
                return Ok(signature);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(SvmChainProviderError::ConfirmationTimeout(self.chain.clone()));
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    }

    pub async fn ping(&self) -> Result<(), SvmChainProviderError> {
        self.latest_blockhash().await.map(|_| ())
    }
}

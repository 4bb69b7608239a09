//! The EVM chain adapter: read helpers, multicall, and signer-backed
//! writes. Supports only a single configured signer per chain (no
//! round-robin fleet) — wallet modes are single-signer and there is no
//! automatic fee-payer funding.

use std::time::Duration;

use alloy_contract::Error as ContractError;
use alloy_network::{Ethereum, EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types_eth::{BlockId, TransactionReceipt, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use alloy_transport_http::Http;
use async_trait::async_trait;
use bridge_types::adapter::{ChainAdapter, ChainKind, FromConfig};
use bridge_types::ChainId;
use url::Url;

use crate::config::{EvmChainConfig, EvmWalletConfig};
use crate::error::EvmChainProviderError;

/// A single multicall read, paired with a label used only for error
/// reporting. Multicall has all-success-or-fail semantics here: any
/// sub-call failure fails the whole read, rather than letting callers
/// inspect per-call success the way raw `aggregate3` allows.
pub struct MulticallRead {
    pub target: Address,
    pub calldata: Bytes,
}

pub struct EvmChainProvider {
    chain: ChainId,
    provider: DynProvider<Ethereum>,
    signer_address: Option<Address>,
    receipt_timeout: Duration,
}

impl std::fmt::Debug for EvmChainProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmChainProvider")
            .field("chain", &self.chain)
            .field("signer_address", &self.signer_address)
            .finish()
    }
}

fn build_http_transport(rpc_endpoints: &[Url]) -> Result<RpcClient, EvmChainProviderError> {
    // Multiple endpoints are tried in order; a production build would wrap
    // these in a `FallbackLayer`/`ThrottleLayer` tower stack. This adapter
    // keeps the simple case (first endpoint) explicit and documents the
    // extension point rather than speculatively building unused fallback
    // plumbing.
    let primary = rpc_endpoints
        .first()
        .ok_or_else(|| EvmChainProviderError::Transport("empty RPC endpoint list".into()))?;
    Ok(RpcClient::new_http(primary.clone()))
}

#[async_trait]
impl FromConfig<EvmChainConfig> for EvmChainProvider {
    type Error = EvmChainProviderError;

    async fn from_config(config: &EvmChainConfig) -> Result<Self, Self::Error> {
        let chain = ChainId::new("eip155", config.chain_reference.clone());
        let rpc_endpoints: Vec<Url> = config.rpc.iter().map(|r| r.http.clone()).collect();
        if rpc_endpoints.is_empty() {
            return Err(EvmChainProviderError::NoRpcEndpoints(chain));
        }
        let rpc_client = build_http_transport(&rpc_endpoints)?;
        let root = RootProvider::<Ethereum>::new(rpc_client);

        let (provider, signer_address) = match &config.wallet {
            EvmWalletConfig::None => {
                let provider = ProviderBuilder::new().connect_provider(root).erased();
                (provider, None)
            }
            EvmWalletConfig::PrivateKey { key } => {
                let signer = PrivateKeySigner::from_bytes(&key.0)
                    .map_err(|e| EvmChainProviderError::InvalidSigner(e.to_string()))?;
                let address = signer.address();
                let wallet = EthereumWallet::from(signer);
                let provider = ProviderBuilder::new()
                    .wallet(wallet)
                    .connect_provider(root)
                    .erased();
                (provider, Some(address))
            }
        };

        Ok(Self {
            chain,
            provider,
            signer_address,
            receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
        })
    }
}

impl ChainAdapter for EvmChainProvider {
    fn kind(&self) -> ChainKind {
        ChainKind::Evm
    }

    fn chain_id(&self) -> &ChainId {
        &self.chain
    }
}

impl EvmChainProvider {
    pub fn signer_address(&self) -> Option<Address> {
        self.signer_address
    }

    pub fn inner(&self) -> &DynProvider<Ethereum> {
        &self.provider
    }

    pub async fn block_number(&self) -> Result<u64, EvmChainProviderError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| EvmChainProviderError::Rpc(e.to_string()))
    }

    pub async fn transaction_receipt(
        &self,
        tx_hash: B256,
    ) -> Result<Option<TransactionReceipt>, EvmChainProviderError> {
        self.provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| EvmChainProviderError::Rpc(e.to_string()))
    }

    /// A generic contract read: calls `calldata` against `target` at the
    /// latest block and returns the raw return bytes.
    pub async fn call(&self, target: Address, calldata: Bytes) -> Result<Bytes, EvmChainProviderError> {
        let tx = TransactionRequest::default().to(target).input(calldata.into());
        self.provider
            .call(tx)
            .await
            .map_err(|e| EvmChainProviderError::Rpc(e.to_string()))
    }

    /// Like [`Self::call`], pinned to a historical block. Used by proof
    /// generation, which must read `generateProof(nonce)` at the exact
    /// block the destination has recorded as final for the source chain.
    pub async fn call_at_block(
        &self,
        target: Address,
        calldata: Bytes,
        block_number: u64,
    ) -> Result<Bytes, EvmChainProviderError> {
        let tx = TransactionRequest::default().to(target).input(calldata.into());
        self.provider
            .call(tx)
            .block(BlockId::from(block_number))
            .await
            .map_err(|e| EvmChainProviderError::Rpc(e.to_string()))
    }

    pub async fn estimate_gas(
        &self,
        to: Address,
        data: Bytes,
        value: U256,
        from: Option<Address>,
    ) -> Result<u64, EvmChainProviderError> {
        let mut tx = TransactionRequest::default().to(to).input(data.into()).value(value);
        if let Some(from) = from.or(self.signer_address) {
            tx = tx.from(from);
        }
        self.provider
            .estimate_gas(tx)
            .await
            .map_err(|e| EvmChainProviderError::Rpc(e.to_string()))
    }

    /// Batches several reads into one RPC round trip via `eth_call` against
    /// Multicall3, asserting every sub-call succeeds. A single failing
    /// sub-call fails the whole read — this SDK has no use for partial
    /// multicall results (see [`MulticallRead`]).
    pub async fn multicall(
        &self,
        reads: Vec<MulticallRead>,
    ) -> Result<Vec<Bytes>, EvmChainProviderError> {
        use alloy_sol_types::sol;

        sol! {
            #[derive(Debug)]
            struct Call3 {
                address target;
                bool allowFailure;
                bytes callData;
            }
            #[derive(Debug)]
            struct Result3 {
                bool success;
                bytes returnData;
            }
            #[sol(rpc)]
            interface IMulticall3 {
                function aggregate3(Call3[] calldata calls) external payable returns (Result3[] memory returnData);
            }
        }

        const MULTICALL3_ADDRESS: Address = Address::new([
            0xca, 0x11, 0x13, 0x73, 0x98, 0x43, 0xcd, 0xf3, 0xf2, 0x03, 0x3f, 0xee, 0x8d, 0x5b,
            0xd4, 0x27, 0x39, 0x19, 0x32, 0x73,
        ]);

        let calls: Vec<Call3> = reads
            .into_iter()
            .map(|r| Call3 {
                target: r.target,
                allowFailure: false,
                callData: r.calldata,
            })
            .collect();

        let contract = IMulticall3::new(MULTICALL3_ADDRESS, self.provider.clone());
        let results = contract
            .aggregate3(calls)
            .call()
            .await
            .map_err(|e: ContractError| EvmChainProviderError::MulticallFailure(e.to_string()))?;

        let mut out = Vec::with_capacity(results.len());
        for (i, result) in results.into_iter().enumerate() {
            if !result.success {
                return Err(EvmChainProviderError::MulticallFailure(format!(
                    "sub-call {i} failed"
                )));
            }
            out.push(result.returnData);
        }
        Ok(out)
    }

    /// Submits a signed transaction and waits up to the configured
    /// timeout for its receipt.
    pub async fn write_contract(
        &self,
        to: Address,
        calldata: Bytes,
        value: U256,
    ) -> Result<TransactionReceipt, EvmChainProviderError> {
        if self.signer_address.is_none() {
            return Err(EvmChainProviderError::NoSigner);
        }
        let tx = TransactionRequest::default().to(to).input(calldata.into()).value(value);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| EvmChainProviderError::Rpc(e.to_string()))?;
        let tx_hash = *pending.tx_hash();
        tokio::time::timeout(self.receipt_timeout, pending.get_receipt())
            .await
            .map_err(|_| EvmChainProviderError::ReceiptTimeout(tx_hash, self.receipt_timeout))?
            .map_err(|e| EvmChainProviderError::Rpc(e.to_string()))
    }

    pub async fn ping(&self) -> Result<(), EvmChainProviderError> {
        self.block_number().await.map(|_| ())
    }
}

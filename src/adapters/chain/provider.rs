//! EVM RPC Provider - alloy-rs Connection Management
//!
//! Manages the connection to a single JSON-RPC endpoint via alloy-rs and
//! implements the `NodeClient` port on top of it. Validates the chain ID
//! at connect time so a misconfigured endpoint never signs for the
//! wrong chain.
//!
//! `ProviderBuilder::new().connect_http()` returns a deeply nested filler
//! type; we store it as a type-erased `dyn Provider`.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::ReceiptResponse;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest as RpcTransactionRequest;
use alloy::transports::TransportError;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, info, instrument};

use crate::config::NodeConfig;
use crate::domain::transaction::{ReceiptStatus, TransactionReceipt};
use crate::ports::node::NodeClient;

/// Shared RPC node handle backed by alloy-rs.
///
/// Every lifecycle component shares one instance behind an `Arc`.
pub struct RpcNode {
    /// The alloy HTTP provider (type-erased).
    provider: Arc<dyn Provider + Send + Sync>,
    /// Per-request timeout.
    request_timeout: Duration,
}

impl RpcNode {
    /// Connect to the configured RPC endpoint and validate its chain ID.
    ///
    /// The RPC URL comes from `config.toml` and is never logged, since
    /// hosted endpoints often embed an API key in the path.
    #[instrument(skip_all, fields(chain_id = config.chain_id))]
    pub async fn connect(config: &NodeConfig) -> Result<Self> {
        let provider = ProviderBuilder::new()
            .connect_http(config.rpc_url.parse().context("Invalid RPC URL")?);
        let provider: Arc<dyn Provider + Send + Sync> = Arc::new(provider);

        let node = Self {
            provider,
            request_timeout: Duration::from_secs(config.timeout_seconds),
        };

        let reported = node
            .bounded("chain id", node.provider.get_chain_id())
            .await
            .context("Failed to query chain ID")?;

        if reported != config.chain_id {
            bail!(
                "RPC endpoint serves chain {reported}, config expects {}",
                config.chain_id
            );
        }

        info!(chain_id = reported, "Connected to RPC node");
        Ok(node)
    }

    /// Run one RPC request under the configured timeout.
    ///
    /// Transport and node errors pass through unchanged so rejection
    /// reasons reach the caller verbatim.
    async fn bounded<T, F>(&self, op: &'static str, request: F) -> Result<T>
    where
        F: IntoFuture<Output = Result<T, TransportError>>,
    {
        match timeout(self.request_timeout, request).await {
            Ok(result) => result.map_err(anyhow::Error::from),
            Err(_) => bail!("{op} request timed out after {:?}", self.request_timeout),
        }
    }
}

#[async_trait]
impl NodeClient for RpcNode {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let request = RpcTransactionRequest::default().to(to).input(data.into());
        self.bounded("eth_call", self.provider.call(request)).await
    }

    async fn pending_nonce(&self, address: Address) -> Result<u64> {
        self.bounded(
            "pending nonce",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    async fn suggest_gas_tip_cap(&self) -> Result<u128> {
        self.bounded("priority fee", self.provider.get_max_priority_fee_per_gas())
            .await
    }

    async fn suggest_gas_price(&self) -> Result<u128> {
        self.bounded("gas price", self.provider.get_gas_price()).await
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<TxHash> {
        let pending = self
            .bounded(
                "send raw transaction",
                self.provider.send_raw_transaction(&raw),
            )
            .await?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<TransactionReceipt>> {
        let receipt = self
            .bounded("receipt", self.provider.get_transaction_receipt(tx_hash))
            .await?;

        let Some(receipt) = receipt else {
            return Ok(None);
        };

        // Some nodes return a receipt for a pending block without a number.
        let Some(block_number) = receipt.block_number() else {
            debug!(tx_hash = %tx_hash, "Receipt without block number, treating as pending");
            return Ok(None);
        };

        let status = if receipt.status() {
            ReceiptStatus::Success
        } else {
            ReceiptStatus::Reverted
        };

        Ok(Some(TransactionReceipt {
            status,
            block_number,
            transaction_hash: receipt.transaction_hash(),
        }))
    }
}

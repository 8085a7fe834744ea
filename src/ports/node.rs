//! Node Client Port - JSON-RPC Capability Interface
//!
//! The exact slice of the node RPC surface the lifecycle consumes.
//! Every component shares one implementation read-only; none mutates
//! client state. Tests substitute a deterministic double.

use alloy::primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;

use crate::domain::transaction::TransactionReceipt;

/// Trait for the node RPC surface (static call, nonce, fees, submit, receipts).
///
/// Errors are adapter-level (`anyhow`); the core maps them into
/// `TxError` together with the step that failed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NodeClient: Send + Sync + 'static {
  /// `eth_call` against the latest block. Returns the raw return data.
  async fn call(&self, to: Address, data: Bytes) -> anyhow::Result<Bytes>;

  /// Account nonce including transactions still in the pending pool.
  async fn pending_nonce(&self, address: Address) -> anyhow::Result<u64>;

  /// Suggested priority tip (wei).
  async fn suggest_gas_tip_cap(&self) -> anyhow::Result<u128>;

  /// Suggested gas price (wei). Doubles as the fee cap for type-2 envelopes.
  async fn suggest_gas_price(&self) -> anyhow::Result<u128>;

  /// Submit an EIP-2718 encoded signed transaction.
  ///
  /// Rejections carry the node's reason text unchanged.
  async fn send_raw_transaction(&self, raw: Bytes) -> anyhow::Result<TxHash>;

  /// Receipt for a mined transaction; `None` while still pending.
  async fn transaction_receipt(&self, tx_hash: TxHash) -> anyhow::Result<Option<TransactionReceipt>>;
}

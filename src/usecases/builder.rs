//! Transaction Builder Use Case - Unsigned Transaction Assembly
//!
//! Turns a `TransactionRequest` into an `UnsignedTransaction` priced for
//! the chain's fee model, using live node state:
//! 1. Parse the destination (before any network call)
//! 2. Pending-inclusive nonce of the sender
//! 3. Fee suggestions for the chain's fee model
//!
//! Read-only and idempotent; safe to retry. The nonce is a snapshot of
//! the pending pool, so callers must not build two transactions for the
//! same sender concurrently (see `AddressSequencer`).

use std::sync::Arc;

use alloy::primitives::Address;
use tracing::{info, instrument};

use crate::adapters::chain::gas::{GasOracle, wei_to_gwei};
use crate::domain::chain::FeeModel;
use crate::domain::error::{TxError, TxResult};
use crate::domain::transaction::{FeeProfile, TransactionRequest, UnsignedTransaction};
use crate::ports::node::NodeClient;

/// Assembles unsigned transactions against the shared node client.
pub struct TransactionBuilder<N: NodeClient> {
  node: Arc<N>,
  gas: GasOracle<N>,
  /// Gas ceiling applied to every transaction.
  gas_limit: u64,
}

impl<N: NodeClient> TransactionBuilder<N> {
  /// Create a builder with a fixed gas ceiling.
  pub fn new(node: Arc<N>, gas_limit: u64) -> Self {
    Self {
      gas: GasOracle::new(Arc::clone(&node)),
      node,
      gas_limit,
    }
  }

  /// Build an unsigned transaction for `request`.
  ///
  /// # Errors
  /// - `InvalidAddress` if `request.to` does not parse
  /// - `NetworkQuery` if the nonce or a fee suggestion query fails
  #[instrument(skip(self, request), fields(chain_id = request.chain_id, from = %request.from))]
  pub async fn build(&self, request: TransactionRequest) -> TxResult<UnsignedTransaction> {
    let to: Address = request
      .to
      .trim()
      .parse()
      .map_err(|e| TxError::InvalidAddress {
        input: request.to.clone(),
        reason: format!("{e}"),
      })?;

    let model = FeeModel::for_chain(request.chain_id);

    let nonce = self
      .node
      .pending_nonce(request.from)
      .await
      .map_err(|e| {
        TxError::network(
          "pending nonce",
          format!("{} on chain {}", request.from, request.chain_id),
          &e,
        )
      })?;

    let fee = self
      .gas
      .fee_profile(model, request.chain_id, request.from)
      .await?;

    match fee {
      FeeProfile::DynamicFee { tip_cap, fee_cap } => info!(
        nonce,
        %to,
        tip_gwei = wei_to_gwei(tip_cap),
        fee_cap_gwei = wei_to_gwei(fee_cap),
        gas_limit = self.gas_limit,
        "Dynamic-fee transaction built"
      ),
      FeeProfile::Legacy { gas_price } => info!(
        nonce,
        %to,
        gas_price_gwei = wei_to_gwei(gas_price),
        gas_limit = self.gas_limit,
        "Legacy transaction built"
      ),
    }

    Ok(UnsignedTransaction {
      chain_id: request.chain_id,
      from: request.from,
      to,
      value: request.value,
      payload: request.payload,
      nonce,
      gas_limit: self.gas_limit,
      fee,
    })
  }
}

#[cfg(test)]
mod tests {
  use alloy::primitives::{Bytes, U256};
  use mockall::predicate::*;

  use super::*;
  use crate::domain::chain::{BSC, DEFAULT_GAS_LIMIT, POLYGON};
  use crate::ports::node::MockNodeClient;

  fn request(chain_id: u64, to: &str) -> TransactionRequest {
    TransactionRequest {
      chain_id,
      from: Address::repeat_byte(0x11),
      to: to.to_string(),
      value: U256::ZERO,
      payload: Bytes::from(vec![0xde, 0xad]),
    }
  }

  #[tokio::test]
  async fn test_build_dynamic_fee() {
    let mut node = MockNodeClient::new();
    node
      .expect_pending_nonce()
      .with(eq(Address::repeat_byte(0x11)))
      .times(1)
      .returning(|_| Ok(9));
    node.expect_suggest_gas_tip_cap().times(1).returning(|| Ok(2));
    node.expect_suggest_gas_price().times(1).returning(|| Ok(40));

    let builder = TransactionBuilder::new(Arc::new(node), DEFAULT_GAS_LIMIT);
    let tx = builder
      .build(request(POLYGON, "0x2222222222222222222222222222222222222222"))
      .await
      .unwrap();

    assert_eq!(tx.nonce, 9);
    assert_eq!(tx.fee, FeeProfile::DynamicFee { tip_cap: 2, fee_cap: 40 });
    assert_eq!(tx.to, Address::repeat_byte(0x22));
    assert_eq!(tx.gas_limit, DEFAULT_GAS_LIMIT);
    assert_eq!(tx.payload, Bytes::from(vec![0xde, 0xad]));
  }

  #[tokio::test]
  async fn test_build_legacy_skips_tip_query() {
    let mut node = MockNodeClient::new();
    node.expect_pending_nonce().returning(|_| Ok(0));
    node.expect_suggest_gas_tip_cap().never();
    node.expect_suggest_gas_price().times(1).returning(|| Ok(5));

    let builder = TransactionBuilder::new(Arc::new(node), 500_000);
    let tx = builder
      .build(request(BSC, "2222222222222222222222222222222222222222"))
      .await
      .unwrap();

    assert_eq!(tx.fee, FeeProfile::Legacy { gas_price: 5 });
    assert_eq!(tx.gas_limit, 500_000);
  }

  #[tokio::test]
  async fn test_invalid_destination_makes_no_queries() {
    let mut node = MockNodeClient::new();
    node.expect_pending_nonce().never();
    node.expect_suggest_gas_price().never();

    let builder = TransactionBuilder::new(Arc::new(node), DEFAULT_GAS_LIMIT);
    let err = builder.build(request(POLYGON, "0x1234")).await.unwrap_err();

    match err {
      TxError::InvalidAddress { input, .. } => assert_eq!(input, "0x1234"),
      other => panic!("unexpected error: {other}"),
    }
  }

  #[tokio::test]
  async fn test_nonce_failure_is_network_error() {
    let mut node = MockNodeClient::new();
    node
      .expect_pending_nonce()
      .returning(|_| Err(anyhow::anyhow!("503 Service Unavailable")));

    let builder = TransactionBuilder::new(Arc::new(node), DEFAULT_GAS_LIMIT);
    let err = builder
      .build(request(POLYGON, "0x2222222222222222222222222222222222222222"))
      .await
      .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("pending nonce"));
    assert!(msg.contains("chain 137"));
    assert!(msg.contains("503"));
  }
}

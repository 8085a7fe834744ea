//! Broadcaster Use Case - Raw Transaction Submission
//!
//! Submits a signed transaction and returns its hash as soon as the node
//! accepts it into the pending pool. Does not wait for mining.

use std::sync::Arc;

use alloy::primitives::TxHash;
use tracing::{info, instrument, warn};

use crate::domain::chain::explorer_tx_url;
use crate::domain::error::{TxError, TxResult};
use crate::domain::transaction::SignedTransaction;
use crate::ports::node::NodeClient;

/// Submits signed transactions through the shared node client.
pub struct TransactionBroadcaster<N: NodeClient> {
  node: Arc<N>,
}

impl<N: NodeClient> TransactionBroadcaster<N> {
  pub fn new(node: Arc<N>) -> Self {
    Self { node }
  }

  /// Submit `tx` and return the transaction hash.
  ///
  /// # Errors
  /// `Broadcast` with the node's rejection text unchanged (underpriced,
  /// nonce too low, insufficient funds, ...).
  #[instrument(skip(self, tx), fields(chain_id = tx.chain_id, nonce = tx.nonce, tx_hash = %tx.tx_hash))]
  pub async fn broadcast(&self, tx: &SignedTransaction) -> TxResult<TxHash> {
    let tx_hash = self
      .node
      .send_raw_transaction(tx.raw.clone())
      .await
      .map_err(|e| {
        warn!(error = %e, "Node rejected transaction");
        TxError::Broadcast {
          chain_id: tx.chain_id,
          from: tx.from,
          reason: e.to_string(),
        }
      })?;

    if tx_hash != tx.tx_hash {
      warn!(
        local = %tx.tx_hash,
        reported = %tx_hash,
        "Node reported a different transaction hash"
      );
    }

    match explorer_tx_url(tx.chain_id, &tx_hash.to_string()) {
      Some(url) => info!(%tx_hash, explorer = %url, "Transaction sent"),
      None => info!(%tx_hash, "Transaction sent"),
    }

    Ok(tx_hash)
  }
}

#[cfg(test)]
mod tests {
  use alloy::primitives::{Address, Bytes, keccak256};

  use super::*;
  use crate::domain::chain::FeeModel;
  use crate::ports::node::MockNodeClient;

  fn signed() -> SignedTransaction {
    let raw = Bytes::from(vec![0x02, 0xf8, 0x01]);
    SignedTransaction {
      chain_id: 1,
      from: Address::repeat_byte(0x11),
      nonce: 4,
      fee_model: FeeModel::DynamicFee,
      tx_hash: keccak256(&raw),
      raw,
    }
  }

  #[tokio::test]
  async fn test_broadcast_returns_hash() {
    let tx = signed();
    let expected = tx.tx_hash;

    let mut node = MockNodeClient::new();
    node
      .expect_send_raw_transaction()
      .times(1)
      .returning(|raw| Ok(keccak256(&raw)));

    let broadcaster = TransactionBroadcaster::new(Arc::new(node));
    assert_eq!(broadcaster.broadcast(&tx).await.unwrap(), expected);
  }

  #[tokio::test]
  async fn test_rejection_reason_is_verbatim() {
    let mut node = MockNodeClient::new();
    node
      .expect_send_raw_transaction()
      .returning(|_| Err(anyhow::anyhow!("nonce too low: next nonce 5, tx nonce 4")));

    let broadcaster = TransactionBroadcaster::new(Arc::new(node));
    let err = broadcaster.broadcast(&signed()).await.unwrap_err();

    match err {
      TxError::Broadcast { reason, chain_id, .. } => {
        assert_eq!(reason, "nonce too low: next nonce 5, tx nonce 4");
        assert_eq!(chain_id, 1);
      }
      other => panic!("unexpected error: {other}"),
    }
  }
}

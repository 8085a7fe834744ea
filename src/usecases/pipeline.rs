//! Transaction Pipeline - Build, Sign, Broadcast, Confirm
//!
//! Runs one full lifecycle under the sender's sequence guard:
//! 1. Acquire the per-address guard, unless cancellation already fired
//! 2. Build (nonce + fees for the chain's fee model)
//! 3. Sign with the transient key
//! 4. Broadcast and journal the hash
//! 5. Wait for the receipt (cancellable) and journal the outcome
//!
//! A reverted receipt is still a receipt; callers decide whether that
//! is a failure. Journal write failures are logged and never abort a
//! lifecycle that already reached the network.

use std::io::Write;
use std::sync::Arc;

use alloy::primitives::TxHash;
use chrono::Utc;
use tracing::{info, instrument, warn};

use super::broadcaster::TransactionBroadcaster;
use super::builder::TransactionBuilder;
use super::confirmation::{CancelSignal, ConfirmationWaiter, PollPolicy};
use super::sequencer::AddressSequencer;
use crate::adapters::chain::signer::TransactionSigner;
use crate::domain::error::{TxError, TxResult};
use crate::domain::keys::KeyMaterial;
use crate::domain::transaction::{
  ReceiptStatus, SignedTransaction, TransactionReceipt, TransactionRequest,
};
use crate::ports::journal::{JournalEntry, JournalEvent, TxJournal};
use crate::ports::node::NodeClient;

/// End-to-end lifecycle runner over one node client.
pub struct TransactionPipeline<N: NodeClient> {
  builder: TransactionBuilder<N>,
  signer: TransactionSigner,
  broadcaster: TransactionBroadcaster<N>,
  waiter: ConfirmationWaiter<N>,
  sequencer: Arc<AddressSequencer>,
  journal: Option<Arc<dyn TxJournal>>,
}

impl<N: NodeClient> TransactionPipeline<N> {
  /// Create a pipeline with its own sequencer and no journal.
  pub fn new(node: Arc<N>, gas_limit: u64, policy: PollPolicy) -> Self {
    Self {
      builder: TransactionBuilder::new(Arc::clone(&node), gas_limit),
      signer: TransactionSigner::new(),
      broadcaster: TransactionBroadcaster::new(Arc::clone(&node)),
      waiter: ConfirmationWaiter::new(node, policy),
      sequencer: Arc::new(AddressSequencer::new()),
      journal: None,
    }
  }

  /// Share a sequencer with other pipelines using the same senders.
  pub fn with_sequencer(mut self, sequencer: Arc<AddressSequencer>) -> Self {
    self.sequencer = sequencer;
    self
  }

  pub fn with_journal(mut self, journal: Arc<dyn TxJournal>) -> Self {
    self.journal = Some(journal);
    self
  }

  /// Show the waiting indicator on `sink`.
  pub fn with_progress(mut self, sink: impl Write + Send + 'static) -> Self {
    self.waiter = self.waiter.with_progress(sink);
    self
  }

  /// Run one lifecycle and return the mined receipt.
  ///
  /// The key is used for signing only and dropped by the caller.
  ///
  /// # Errors
  /// Any `TxError` from the stage that failed. `Cancelled` means the
  /// transaction was broadcast and may still be mined.
  /// `CancelledBeforeBroadcast` means the signal fired before build.
  #[instrument(skip_all, fields(chain_id = request.chain_id, from = %request.from))]
  pub async fn execute(
    &self,
    request: TransactionRequest,
    key: &KeyMaterial,
    cancel: &CancelSignal,
  ) -> TxResult<TransactionReceipt> {
    let _sequence = self.sequencer.acquire(request.from).await;

    if cancel.is_cancelled() {
      return Err(TxError::CancelledBeforeBroadcast { from: request.from });
    }

    let unsigned = self.builder.build(request).await?;
    let signed = self.signer.sign(unsigned, key)?;
    let tx_hash = self.broadcaster.broadcast(&signed).await?;
    self.record(JournalEvent::Broadcast, &signed, tx_hash, None).await;

    let result = self.waiter.wait(tx_hash, cancel).await;
    match &result {
      Ok(receipt) => {
        let event = match receipt.status {
          ReceiptStatus::Success => JournalEvent::Confirmed,
          ReceiptStatus::Reverted => JournalEvent::Reverted,
        };
        self
          .record(event, &signed, tx_hash, Some(receipt.block_number))
          .await;
        info!(%tx_hash, status = %receipt.status, "Lifecycle complete");
      }
      Err(e) => {
        self.record(JournalEvent::Abandoned, &signed, tx_hash, None).await;
        warn!(%tx_hash, error = %e, "Lifecycle ended without a receipt");
      }
    }

    result
  }

  async fn record(
    &self,
    event: JournalEvent,
    signed: &SignedTransaction,
    tx_hash: TxHash,
    block_number: Option<u64>,
  ) {
    let Some(journal) = &self.journal else {
      return;
    };
    let entry = JournalEntry {
      event,
      chain_id: signed.chain_id,
      from: signed.from.to_checksum(None),
      nonce: signed.nonce,
      tx_hash: tx_hash.to_string(),
      block_number,
      recorded_at: Utc::now(),
    };
    if let Err(e) = journal.record(&entry).await {
      warn!(error = %e, ?event, "Failed to journal transaction event");
    }
  }
}

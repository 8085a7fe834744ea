//! Confirmation Waiter Use Case - Cancellable Receipt Polling
//!
//! Polls the node for a mined receipt at a fixed interval until one
//! appears, the cancellation signal fires, or an optional deadline
//! passes. Two states: pending (no receipt yet) and mined. Cancellation
//! and timeout are terminal exits, never reached through polling.
//!
//! While pending, an animated "waiting" line is written to the progress
//! sink. It is output only and never affects control flow.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::TxHash;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::domain::error::{TxError, TxResult};
use crate::domain::transaction::TransactionReceipt;
use crate::ports::node::NodeClient;

const PROGRESS_LABEL: &str = "Waiting for transaction to be mined";
const MAX_DOTS: usize = 3;

// ─── Cancellation ───────────────────────────────────────────

/// Fires the cancellation signal. Dropping the handle does not cancel.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
  pub fn cancel(&self) {
    self.0.send_replace(true);
  }
}

/// Observes the cancellation signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelSignal(watch::Receiver<bool>);

impl CancelSignal {
  /// A signal that never fires.
  pub fn never() -> Self {
    let (_tx, rx) = watch::channel(false);
    Self(rx)
  }

  pub fn is_cancelled(&self) -> bool {
    *self.0.borrow()
  }

  /// Resolve once the signal fires. Pends forever if the handle was
  /// dropped without cancelling.
  pub async fn cancelled(&self) {
    let mut rx = self.0.clone();
    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
      std::future::pending::<()>().await;
    }
  }
}

/// Create a linked cancellation handle and signal.
pub fn cancel_channel() -> (CancelHandle, CancelSignal) {
  let (tx, rx) = watch::channel(false);
  (CancelHandle(tx), CancelSignal(rx))
}

// ─── Poll Policy ────────────────────────────────────────────

/// How often to poll and how long to keep trying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
  /// Delay between receipt lookups.
  pub interval: Duration,
  /// Give up after this long. `None` waits until mined or cancelled.
  pub deadline: Option<Duration>,
}

impl Default for PollPolicy {
  fn default() -> Self {
    Self {
      interval: Duration::from_secs(1),
      deadline: None,
    }
  }
}

// ─── Waiter ─────────────────────────────────────────────────

/// Polls for a mined receipt under a `PollPolicy`.
pub struct ConfirmationWaiter<N: NodeClient> {
  node: Arc<N>,
  policy: PollPolicy,
  progress: Option<Mutex<Box<dyn Write + Send>>>,
}

impl<N: NodeClient> ConfirmationWaiter<N> {
  /// Create a waiter with no progress output.
  pub fn new(node: Arc<N>, policy: PollPolicy) -> Self {
    Self {
      node,
      policy,
      progress: None,
    }
  }

  /// Write the animated progress line to `sink` while waiting.
  pub fn with_progress(mut self, sink: impl Write + Send + 'static) -> Self {
    self.progress = Some(Mutex::new(Box::new(sink)));
    self
  }

  /// Block until `tx_hash` is mined.
  ///
  /// Number of receipt lookups equals the number of absent responses
  /// plus one. A signal that has already fired means no lookup at all.
  /// Both the lookup and the sleep between lookups end as soon as the
  /// signal fires or the deadline passes.
  ///
  /// # Errors
  /// - `Cancelled` when `cancel` fires
  /// - `ConfirmationTimeout` when the policy deadline passes
  /// - `NetworkQuery` when a receipt lookup fails (not retried)
  #[instrument(
    skip(self, cancel),
    fields(interval_ms = u64::try_from(self.policy.interval.as_millis()).unwrap_or(u64::MAX))
  )]
  pub async fn wait(&self, tx_hash: TxHash, cancel: &CancelSignal) -> TxResult<TransactionReceipt> {
    let started = Instant::now();
    let deadline_at = self.policy.deadline.map(|deadline| started + deadline);
    let timed_out = || TxError::ConfirmationTimeout {
      tx_hash,
      waited: started.elapsed(),
    };
    let mut polls: usize = 0;

    let result = loop {
      if cancel.is_cancelled() {
        break Err(TxError::Cancelled { tx_hash });
      }

      polls += 1;
      let lookup = tokio::select! {
        biased;
        () = cancel.cancelled() => break Err(TxError::Cancelled { tx_hash }),
        () = deadline_passed(deadline_at) => break Err(timed_out()),
        lookup = self.node.transaction_receipt(tx_hash) => lookup,
      };
      match lookup {
        Ok(Some(receipt)) => break Ok(receipt),
        Ok(None) => debug!(polls, "Receipt not available yet"),
        Err(e) => break Err(TxError::network("transaction receipt", tx_hash, &e)),
      }

      self.tick(polls);

      tokio::select! {
        biased;
        () = cancel.cancelled() => break Err(TxError::Cancelled { tx_hash }),
        () = deadline_passed(deadline_at) => break Err(timed_out()),
        () = tokio::time::sleep(self.policy.interval) => {}
      }
    };

    self.finish();

    match &result {
      Ok(receipt) => info!(
        polls,
        block = receipt.block_number,
        status = %receipt.status,
        "Transaction mined"
      ),
      Err(e) if e.is_cancelled() => warn!(polls, "Confirmation wait cancelled"),
      Err(e) => warn!(polls, error = %e, "Confirmation wait failed"),
    }

    result
  }

  fn tick(&self, polls: usize) {
    let Some(progress) = &self.progress else {
      return;
    };
    let dots = polls % (MAX_DOTS + 1);
    if let Ok(mut sink) = progress.lock() {
      let _ = write!(
        sink,
        "\r{PROGRESS_LABEL}{:<width$}",
        ".".repeat(dots),
        width = MAX_DOTS
      );
      let _ = sink.flush();
    }
  }

  fn finish(&self) {
    let Some(progress) = &self.progress else {
      return;
    };
    if let Ok(mut sink) = progress.lock() {
      let _ = writeln!(sink);
      let _ = sink.flush();
    }
  }
}

/// Resolve at `at`, or never when there is no deadline.
async fn deadline_passed(at: Option<Instant>) {
  match at {
    Some(at) => tokio::time::sleep_until(at).await,
    None => std::future::pending::<()>().await,
  }
}

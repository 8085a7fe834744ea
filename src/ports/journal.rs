//! Journal Port - Transaction Lifecycle Records
//!
//! Append-only record of broadcasts and confirmations. Used to diagnose
//! stuck or replaced transactions after the fact; the lifecycle never
//! reads it back to make decisions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalEvent {
  /// Accepted by the node into its pending pool.
  Broadcast,
  /// Mined with success status.
  Confirmed,
  /// Mined with failure status.
  Reverted,
  /// Confirmation wait cancelled; the transaction may still be mined.
  Abandoned,
}

/// A single journal line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
  /// Lifecycle event.
  pub event: JournalEvent,
  /// Chain the transaction was signed for.
  pub chain_id: u64,
  /// Sending address (checksummed hex).
  pub from: String,
  /// Account nonce used.
  pub nonce: u64,
  /// Transaction hash (hex).
  pub tx_hash: String,
  /// Block number, once mined.
  pub block_number: Option<u64>,
  /// When the event was recorded.
  pub recorded_at: DateTime<Utc>,
}

/// Trait for lifecycle journal sinks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TxJournal: Send + Sync + 'static {
  /// Append one entry.
  async fn record(&self, entry: &JournalEntry) -> anyhow::Result<()>;

  /// Load every entry recorded so far (for analysis).
  async fn load_all(&self) -> anyhow::Result<Vec<JournalEntry>>;
}

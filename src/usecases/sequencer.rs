//! Address Sequencer - One In-flight Lifecycle per Sender
//!
//! The builder's nonce is a snapshot of the pending pool. Two lifecycles
//! for the same sender running side by side would read the same nonce
//! and one would replace or invalidate the other. Callers hold the
//! guard returned by `acquire` from build until confirmation.
//! Different senders never block each other. An entry is dropped from
//! the table once its last guard or waiter is gone.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as SyncMutex};

use alloy::primitives::Address;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

type LockTable = HashMap<Address, Arc<Mutex<()>>>;

/// Per-address async lock table.
#[derive(Debug, Default)]
pub struct AddressSequencer {
  // Only held for map lookups, never across an await.
  locks: Arc<SyncMutex<LockTable>>,
}

/// Held for the whole lifecycle of one transaction from `address`.
#[derive(Debug)]
pub struct SequenceGuard {
  address: Address,
  table: Arc<SyncMutex<LockTable>>,
  guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SequenceGuard {
  fn drop(&mut self) {
    drop(self.guard.take());
    let Ok(mut locks) = self.table.lock() else {
      return;
    };
    // Waiters clone the entry under the table lock, so a count of one
    // means nobody else holds or awaits it.
    if locks
      .get(&self.address)
      .is_some_and(|lock| Arc::strong_count(lock) == 1)
    {
      locks.remove(&self.address);
    }
  }
}

impl AddressSequencer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Wait for exclusive use of `address`.
  pub async fn acquire(&self, address: Address) -> SequenceGuard {
    let lock = {
      let mut locks = self
        .locks
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
      Arc::clone(locks.entry(address).or_default())
    };
    let guard = lock.lock_owned().await;
    debug!(%address, "Sender sequence acquired");
    SequenceGuard {
      address,
      table: Arc::clone(&self.locks),
      guard: Some(guard),
    }
  }

  #[cfg(test)]
  fn tracked(&self) -> usize {
    self.locks.lock().map_or(0, |locks| locks.len())
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;

  #[tokio::test]
  async fn test_same_address_is_exclusive() {
    let sequencer = AddressSequencer::new();
    let addr = Address::repeat_byte(0x01);

    let first = sequencer.acquire(addr).await;
    let second = tokio::time::timeout(Duration::from_millis(20), sequencer.acquire(addr)).await;
    assert!(second.is_err(), "second acquire must wait");

    drop(first);
    let third = tokio::time::timeout(Duration::from_millis(200), sequencer.acquire(addr)).await;
    assert!(third.is_ok());
  }

  #[tokio::test]
  async fn test_different_addresses_are_independent() {
    let sequencer = AddressSequencer::new();
    let _a = sequencer.acquire(Address::repeat_byte(0x01)).await;
    let b = tokio::time::timeout(
      Duration::from_millis(20),
      sequencer.acquire(Address::repeat_byte(0x02)),
    )
    .await;
    assert!(b.is_ok());
    assert_eq!(sequencer.tracked(), 2);
  }

  #[tokio::test]
  async fn test_waiters_run_in_turn() {
    let sequencer = Arc::new(AddressSequencer::new());
    let addr = Address::repeat_byte(0x07);
    let active = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let max_seen = Arc::new(std::sync::atomic::AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..4 {
      let sequencer = Arc::clone(&sequencer);
      let active = Arc::clone(&active);
      let max_seen = Arc::clone(&max_seen);
      handles.push(tokio::spawn(async move {
        let _guard = sequencer.acquire(addr).await;
        let now = active.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
        max_seen.fetch_max(now, std::sync::atomic::Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        active.fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
      }));
    }
    for handle in handles {
      handle.await.unwrap();
    }

    assert_eq!(max_seen.load(std::sync::atomic::Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_released_entries_are_pruned() {
    let sequencer = Arc::new(AddressSequencer::new());
    let addr = Address::repeat_byte(0x09);

    let first = sequencer.acquire(addr).await;
    let waiting = {
      let sequencer = Arc::clone(&sequencer);
      tokio::spawn(async move {
        let _guard = sequencer.acquire(addr).await;
      })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    drop(first);
    assert_eq!(sequencer.tracked(), 1, "entry kept while a waiter is queued");

    waiting.await.unwrap();
    assert_eq!(sequencer.tracked(), 0);

    for byte in 0..16u8 {
      drop(sequencer.acquire(Address::repeat_byte(byte)).await);
    }
    assert_eq!(sequencer.tracked(), 0);
  }
}

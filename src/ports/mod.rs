//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `NodeClient`: Read-only queries and raw transaction submission
//! - `TxJournal`: Append-only record of lifecycle events

pub mod journal;
pub mod node;

pub use journal::{JournalEntry, JournalEvent, TxJournal};
pub use node::NodeClient;

//! Persistence Adapters - JSONL-based File Storage
//!
//! Implements the journal port with append-only JSONL files.
//! No database dependency.

pub mod journal;

pub use journal::JsonlJournal;

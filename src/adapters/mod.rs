//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (blockchain RPC, file I/O).
//!
//! Adapter categories:
//! - `chain`: EVM node access, contract reads and signing via alloy-rs
//! - `persistence`: JSONL transaction journal

pub mod chain;
pub mod persistence;

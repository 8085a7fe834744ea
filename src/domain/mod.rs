//! Domain layer - Core types and pure logic.
//!
//! Transaction lifecycle values, the fee model lookup, consent rendering,
//! amount scaling, and the error taxonomy. No network or console I/O
//! happens here (hexagonal architecture inner ring).

pub mod amount;
pub mod chain;
pub mod consent;
pub mod error;
pub mod keys;
pub mod quote;
pub mod transaction;

// Re-export core types for convenience
pub use chain::{ChainId, FeeModel};
pub use consent::{ApprovalSummary, ConsentDecision, PermissionMode, SwapSummary};
pub use error::{TxError, TxResult};
pub use keys::KeyMaterial;
pub use quote::{SwapQuote, TokenInfo};
pub use transaction::{
    FeeProfile, ReceiptStatus, SignedTransaction, TransactionReceipt, TransactionRequest,
    UnsignedTransaction,
};

//! Transaction Lifecycle Errors
//!
//! One taxonomy for every failure the lifecycle can surface. Each
//! variant carries enough context (step, address, chain, method,
//! transaction hash) to diagnose the failure without retrying blindly.
//! Node-reported text is kept verbatim.

use std::fmt;
use std::time::Duration;

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

use super::chain::ChainId;

/// Convenience alias used throughout the core.
pub type TxResult<T> = Result<T, TxError>;

#[derive(Debug, Error)]
pub enum TxError {
    /// Node unreachable or a read-only query failed.
    ///
    /// `context` names what was being queried, e.g. the sending address
    /// and chain, or the transaction hash.
    #[error("{step} query failed ({context}): {reason}")]
    NetworkQuery {
        step: &'static str,
        context: String,
        reason: String,
    },

    #[error("invalid address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },

    /// Key material could not be parsed. Never carries the key itself.
    #[error("invalid private key: {reason}")]
    InvalidKey { reason: String },

    #[error("signing failed on chain {chain_id}: {reason}")]
    Signing { chain_id: ChainId, reason: String },

    /// Node rejected the raw transaction (underpriced, nonce too low, ...).
    #[error("broadcast from {from} rejected on chain {chain_id}: {reason}")]
    Broadcast {
        chain_id: ChainId,
        from: Address,
        reason: String,
    },

    #[error("could not encode arguments for {method}(): {reason}")]
    AbiEncode { method: &'static str, reason: String },

    #[error("could not decode {method}() result from {contract}: {reason}")]
    AbiDecode {
        method: &'static str,
        contract: Address,
        reason: String,
    },

    #[error("{method}() call to {contract} rejected: {reason}")]
    Call {
        method: &'static str,
        contract: Address,
        reason: String,
    },

    /// Confirmation wait aborted by the cancellation signal.
    #[error("confirmation wait for {tx_hash} cancelled")]
    Cancelled { tx_hash: TxHash },

    /// Cancellation fired before anything was signed or sent.
    #[error("cancelled before broadcast from {from}; nothing was sent")]
    CancelledBeforeBroadcast { from: Address },

    /// Confirmation wait exceeded the configured deadline.
    #[error("transaction {tx_hash} not mined within {waited:?}")]
    ConfirmationTimeout { tx_hash: TxHash, waited: Duration },

    /// Transaction was mined with a failure status.
    #[error("transaction {tx_hash} reverted in block {block_number}")]
    Reverted { tx_hash: TxHash, block_number: u64 },

    #[error("invalid raw amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    /// Calldata supplied by a collaborator is not usable.
    #[error("invalid transaction payload: {reason}")]
    InvalidPayload { reason: String },
}

impl TxError {
    /// Wrap an adapter error from a read-only node query.
    pub fn network(step: &'static str, context: impl fmt::Display, err: &anyhow::Error) -> Self {
        Self::NetworkQuery {
            step,
            context: context.to_string(),
            reason: format!("{err:#}"),
        }
    }

    /// Whether the failure came from the cancellation signal rather
    /// than the node or the inputs.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_reason_is_verbatim() {
        let err = TxError::Broadcast {
            chain_id: 137,
            from: Address::ZERO,
            reason: "replacement transaction underpriced".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("replacement transaction underpriced"));
        assert!(msg.contains("chain 137"));
    }

    #[test]
    fn test_network_error_keeps_context() {
        let err = TxError::network(
            "pending nonce",
            "0xabc on chain 1",
            &anyhow::anyhow!("connection refused"),
        );
        assert_eq!(
            err.to_string(),
            "pending nonce query failed (0xabc on chain 1): connection refused"
        );
    }

    #[test]
    fn test_cancelled_is_distinct() {
        let cancelled = TxError::Cancelled {
            tx_hash: TxHash::ZERO,
        };
        let timeout = TxError::ConfirmationTimeout {
            tx_hash: TxHash::ZERO,
            waited: Duration::from_secs(5),
        };
        assert!(cancelled.is_cancelled());
        assert!(!timeout.is_cancelled());
    }
}

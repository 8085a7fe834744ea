//! Transaction Lifecycle Types
//!
//! The values that flow through build → sign → broadcast → confirm.
//! Each stage consumes the previous stage's value, so a transaction
//! can't be signed twice or broadcast without a signature.

use std::fmt;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use serde::Serialize;

use super::chain::{ChainId, FeeModel};

/// What the caller wants executed on-chain.
///
/// `to` stays a string until the builder parses it, so malformed
/// destinations surface as `InvalidAddress` at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub chain_id: ChainId,
    pub from: Address,
    pub to: String,
    pub value: U256,
    pub payload: Bytes,
}

/// Fee parameters for exactly one envelope shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeProfile {
    /// Type-2 envelope. Both values in wei.
    DynamicFee { tip_cap: u128, fee_cap: u128 },
    /// Legacy envelope. Gas price in wei.
    Legacy { gas_price: u128 },
}

impl FeeProfile {
    pub const fn model(&self) -> FeeModel {
        match self {
            Self::DynamicFee { .. } => FeeModel::DynamicFee,
            Self::Legacy { .. } => FeeModel::Legacy,
        }
    }
}

/// A fully priced transaction, ready for the signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub chain_id: ChainId,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub payload: Bytes,
    /// Pending-inclusive account nonce at build time.
    pub nonce: u64,
    pub gas_limit: u64,
    pub fee: FeeProfile,
}

/// EIP-2718 encoded, signed transaction bound to `chain_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub chain_id: ChainId,
    pub from: Address,
    pub nonce: u64,
    pub fee_model: FeeModel,
    pub tx_hash: TxHash,
    pub raw: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Reverted => f.write_str("reverted"),
        }
    }
}

/// Outcome of a mined transaction. Only exists once mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub status: ReceiptStatus,
    pub block_number: u64,
    pub transaction_hash: TxHash,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

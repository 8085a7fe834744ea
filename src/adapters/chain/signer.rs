//! Transaction Signer - secp256k1 Signing per Envelope Shape
//!
//! Produces an EIP-2718 encoded transaction from an `UnsignedTransaction`
//! and the operator's key. Dynamic-fee requests become type-2 envelopes;
//! legacy requests become EIP-155 replay-protected legacy envelopes. In
//! both cases the signature commits to the chain id, so a signed
//! transaction is not portable across chains.
//!
//! The parsed key lives only for the duration of `sign`.

use alloy::consensus::{SignableTransaction, TxEip1559, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Bytes, TxKind, keccak256};
use alloy::signers::SignerSync;
use alloy::signers::local::PrivateKeySigner;
use tracing::{debug, instrument};

use crate::domain::error::{TxError, TxResult};
use crate::domain::keys::KeyMaterial;
use crate::domain::transaction::{FeeProfile, SignedTransaction, UnsignedTransaction};

/// Stateless signer; holds no key between calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransactionSigner;

impl TransactionSigner {
    pub const fn new() -> Self {
        Self
    }

    /// Sign `tx` with `key`.
    ///
    /// Fails with `InvalidKey` if the key does not parse and with
    /// `Signing` if the key's address is not `tx.from` or the
    /// signature can't be produced.
    #[instrument(skip_all, fields(chain_id = tx.chain_id, nonce = tx.nonce, from = %tx.from))]
    pub fn sign(&self, tx: UnsignedTransaction, key: &KeyMaterial) -> TxResult<SignedTransaction> {
        let signer: PrivateKeySigner =
            key.expose().parse().map_err(|e| TxError::InvalidKey {
                reason: format!("not a 32-byte hex secp256k1 key ({e})"),
            })?;

        let chain_id = tx.chain_id;
        if signer.address() != tx.from {
            return Err(TxError::Signing {
                chain_id,
                reason: format!(
                    "key controls {}, transaction is from {}",
                    signer.address(),
                    tx.from
                ),
            });
        }

        let signing_failed = |e: alloy::signers::Error| TxError::Signing {
            chain_id,
            reason: e.to_string(),
        };

        let fee_model = tx.fee.model();
        let envelope = match tx.fee {
            FeeProfile::DynamicFee { tip_cap, fee_cap } => {
                let inner = TxEip1559 {
                    chain_id,
                    nonce: tx.nonce,
                    gas_limit: tx.gas_limit,
                    max_fee_per_gas: fee_cap,
                    max_priority_fee_per_gas: tip_cap,
                    to: TxKind::Call(tx.to),
                    value: tx.value,
                    input: tx.payload,
                    ..Default::default()
                };
                let signature = signer
                    .sign_hash_sync(&inner.signature_hash())
                    .map_err(signing_failed)?;
                TxEnvelope::from(inner.into_signed(signature))
            }
            FeeProfile::Legacy { gas_price } => {
                let inner = TxLegacy {
                    chain_id: Some(chain_id),
                    nonce: tx.nonce,
                    gas_price,
                    gas_limit: tx.gas_limit,
                    to: TxKind::Call(tx.to),
                    value: tx.value,
                    input: tx.payload,
                };
                let signature = signer
                    .sign_hash_sync(&inner.signature_hash())
                    .map_err(signing_failed)?;
                TxEnvelope::from(inner.into_signed(signature))
            }
        };

        let raw = Bytes::from(envelope.encoded_2718());
        let tx_hash = keccak256(&raw);
        debug!(%tx_hash, %fee_model, "Transaction signed");

        Ok(SignedTransaction {
            chain_id,
            from: tx.from,
            nonce: tx.nonce,
            fee_model,
            tx_hash,
            raw,
        })
    }
}

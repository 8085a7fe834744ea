//! Approval Flow Use Case - Allowance Check Then Consented Approval
//!
//! The canonical "approve-then-swap" prelude:
//! 1. Read the spender's current allowance over the wallet's token
//! 2. Stop if it already covers the required amount
//! 3. Otherwise render the approval summary and ask for consent
//! 4. On approval, run an unlimited `approve(spender, MAX)` lifecycle
//!
//! A declined prompt builds nothing and is not an error.

use std::io::{BufRead, Write};
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::{info, instrument};

use super::confirmation::CancelSignal;
use super::consent::ConsentGate;
use super::pipeline::TransactionPipeline;
use crate::adapters::chain::contracts::{ContractReader, encode_approve};
use crate::domain::chain::ChainId;
use crate::domain::consent::{ApprovalSummary, render_approval_prompt};
use crate::domain::error::{TxError, TxResult};
use crate::domain::keys::KeyMaterial;
use crate::domain::transaction::{TransactionReceipt, TransactionRequest};
use crate::ports::node::NodeClient;

/// What the approval step needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalRequest {
  pub chain_id: ChainId,
  /// Token contract whose allowance is checked.
  pub token: Address,
  /// Contract that will spend the tokens (the aggregator router).
  pub spender: Address,
  /// Token owner and transaction sender.
  pub wallet: Address,
  /// Allowance needed for the upcoming action.
  pub required: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
  /// Existing allowance covers the requirement; nothing was sent.
  AlreadySufficient { allowance: U256 },
  /// User declined; nothing was built or sent.
  Declined,
  /// Unlimited approval mined successfully.
  Approved { receipt: TransactionReceipt },
}

pub struct ApprovalFlow<N: NodeClient> {
  reader: ContractReader<N>,
  pipeline: Arc<TransactionPipeline<N>>,
}

impl<N: NodeClient> ApprovalFlow<N> {
  pub fn new(node: Arc<N>, pipeline: Arc<TransactionPipeline<N>>) -> Self {
    Self {
      reader: ContractReader::new(node),
      pipeline,
    }
  }

  /// Ensure `request.spender` may move at least `request.required`.
  ///
  /// # Errors
  /// Contract-read and lifecycle errors. A mined-but-reverted approval
  /// is `Reverted`.
  #[instrument(skip_all, fields(chain_id = request.chain_id, token = %request.token, spender = %request.spender))]
  pub async fn run<R: BufRead, W: Write>(
    &self,
    request: &ApprovalRequest,
    gate: &mut ConsentGate<R, W>,
    key: &KeyMaterial,
    cancel: &CancelSignal,
  ) -> TxResult<ApprovalOutcome> {
    let allowance = self
      .reader
      .allowance(request.token, request.wallet, request.spender)
      .await?;

    if allowance >= request.required {
      info!(%allowance, required = %request.required, "Allowance already sufficient");
      return Ok(ApprovalOutcome::AlreadySufficient { allowance });
    }

    let token_symbol = self.reader.symbol(request.token).await?;
    let prompt = render_approval_prompt(&ApprovalSummary {
      wallet: request.wallet,
      token_symbol,
    });

    if !gate.ask(&prompt).is_approved() {
      info!("Approval declined, nothing sent");
      return Ok(ApprovalOutcome::Declined);
    }

    let tx = TransactionRequest {
      chain_id: request.chain_id,
      from: request.wallet,
      to: request.token.to_string(),
      value: U256::ZERO,
      payload: encode_approve(request.spender, U256::MAX),
    };

    let receipt = self.pipeline.execute(tx, key, cancel).await?;
    if !receipt.succeeded() {
      return Err(TxError::Reverted {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
      });
    }

    info!(tx_hash = %receipt.transaction_hash, "Unlimited approval confirmed");
    Ok(ApprovalOutcome::Approved { receipt })
  }
}

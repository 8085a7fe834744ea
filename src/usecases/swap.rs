//! Swap Flow Use Case - Consented Router Call
//!
//! Takes a swap response from the quote collaborator, shows the swap
//! summary, and on an affirmative reply runs the router call through
//! the transaction pipeline. `preview` renders the same summary with
//! the "calldata only" warning and never touches the network.

use std::io::{BufRead, Write};
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use tracing::{info, instrument};

use super::confirmation::CancelSignal;
use super::consent::ConsentGate;
use super::pipeline::TransactionPipeline;
use crate::domain::chain::ChainId;
use crate::domain::consent::{PermissionMode, SwapSummary, render_swap_preview, render_swap_prompt};
use crate::domain::error::{TxError, TxResult};
use crate::domain::keys::KeyMaterial;
use crate::domain::quote::SwapQuote;
use crate::domain::transaction::{TransactionReceipt, TransactionRequest};
use crate::ports::node::NodeClient;

/// A swap the caller intends to execute.
#[derive(Debug, Clone)]
pub struct SwapRequest {
  pub chain_id: ChainId,
  pub wallet: Address,
  pub quote: SwapQuote,
  /// Sold amount, raw units of the source token.
  pub amount: U256,
  /// Slippage tolerance in percent.
  pub slippage: Decimal,
  pub permission: PermissionMode,
}

impl SwapRequest {
  /// Summary shown to the user for this swap.
  pub fn summary(&self) -> TxResult<SwapSummary> {
    Ok(SwapSummary {
      from_token: self.quote.from_token.clone(),
      to_token: self.quote.to_token.clone(),
      amount: self.amount,
      estimated_amount_out: self.quote.estimated_amount_out()?,
      slippage: self.slippage,
      permission: self.permission,
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
  /// User declined; nothing was built or sent.
  Declined,
  Executed { receipt: TransactionReceipt },
}

/// Summary for swap calldata that will be executed elsewhere.
pub fn preview(request: &SwapRequest) -> TxResult<String> {
  Ok(render_swap_preview(&request.summary()?))
}

pub struct SwapFlow<N: NodeClient> {
  pipeline: Arc<TransactionPipeline<N>>,
}

impl<N: NodeClient> SwapFlow<N> {
  pub fn new(pipeline: Arc<TransactionPipeline<N>>) -> Self {
    Self { pipeline }
  }

  /// Ask for consent, then execute the router call.
  ///
  /// # Errors
  /// `InvalidPayload` if the quote carries no usable router call,
  /// `InvalidAmount` for a malformed estimate, any lifecycle error,
  /// and `Reverted` for a mined-but-failed swap.
  #[instrument(skip_all, fields(chain_id = request.chain_id, wallet = %request.wallet))]
  pub async fn execute<R: BufRead, W: Write>(
    &self,
    request: &SwapRequest,
    gate: &mut ConsentGate<R, W>,
    key: &KeyMaterial,
    cancel: &CancelSignal,
  ) -> TxResult<SwapOutcome> {
    let router_call = request.quote.tx.as_ref().ok_or_else(|| TxError::InvalidPayload {
      reason: "swap response carries no transaction".to_string(),
    })?;
    let payload = router_call.payload()?;
    let value = router_call.value()?;
    let prompt = render_swap_prompt(&request.summary()?);

    if !gate.ask(&prompt).is_approved() {
      info!("Swap declined, nothing sent");
      return Ok(SwapOutcome::Declined);
    }

    let tx = TransactionRequest {
      chain_id: request.chain_id,
      from: request.wallet,
      to: router_call.to.clone(),
      value,
      payload,
    };

    let receipt = self.pipeline.execute(tx, key, cancel).await?;
    if !receipt.succeeded() {
      return Err(TxError::Reverted {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
      });
    }

    info!(tx_hash = %receipt.transaction_hash, "Swap confirmed");
    Ok(SwapOutcome::Executed { receipt })
  }
}

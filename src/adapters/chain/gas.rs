//! Gas Oracle - Fee Suggestions per Fee Model
//!
//! Turns the node's fee-market suggestions into a `FeeProfile` for the
//! chain's fee model. Dynamic-fee chains get a priority tip and a fee
//! cap (two queries); every other chain gets a single gas price.

use std::sync::Arc;

use alloy::primitives::Address;
use tracing::{debug, instrument};

use crate::domain::chain::{ChainId, FeeModel};
use crate::domain::error::{TxError, TxResult};
use crate::domain::transaction::FeeProfile;
use crate::ports::node::NodeClient;

/// Fee suggestion oracle over the shared node client.
pub struct GasOracle<N: NodeClient> {
    node: Arc<N>,
}

impl<N: NodeClient> GasOracle<N> {
    pub fn new(node: Arc<N>) -> Self {
        Self { node }
    }

    /// Query the suggestions the fee model needs and nothing more.
    ///
    /// `chain_id` and `from` only label errors.
    #[instrument(skip(self))]
    pub async fn fee_profile(
        &self,
        model: FeeModel,
        chain_id: ChainId,
        from: Address,
    ) -> TxResult<FeeProfile> {
        let query_failed = move |step: &'static str| {
            move |e: anyhow::Error| TxError::network(step, format!("{from} on chain {chain_id}"), &e)
        };

        let profile = match model {
            FeeModel::DynamicFee => {
                let tip_cap = self
                    .node
                    .suggest_gas_tip_cap()
                    .await
                    .map_err(query_failed("gas tip cap"))?;
                let fee_cap = self
                    .node
                    .suggest_gas_price()
                    .await
                    .map_err(query_failed("gas fee cap"))?;
                FeeProfile::DynamicFee { tip_cap, fee_cap }
            }
            FeeModel::Legacy => {
                let gas_price = self
                    .node
                    .suggest_gas_price()
                    .await
                    .map_err(query_failed("gas price"))?;
                FeeProfile::Legacy { gas_price }
            }
        };

        debug!(?profile, "Fee profile suggested");
        Ok(profile)
    }
}

/// Convert wei to gwei for log output.
#[allow(clippy::cast_precision_loss)]
pub fn wei_to_gwei(wei: u128) -> f64 {
    wei as f64 / 1_000_000_000.0
}

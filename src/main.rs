//! Swap Executor — Entry Point
//!
//! Ensures the configured spender holds enough allowance over the
//! wallet's token, asking on the terminal before posting an unlimited
//! approval.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate (path from argv, default `config.toml`)
//! 2. Init tracing (JSON structured logging)
//! 3. Load the signing key from `PRIVATE_KEY`
//! 4. Connect the RPC node (chain id checked)
//! 5. Open the JSONL journal if enabled
//! 6. Spawn the Ctrl-C watcher (first press cancels the wait, second exits)
//! 7. Run the approval flow with stdin/stdout consent

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io;
use std::sync::Arc;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use swap_executor::adapters::chain::RpcNode;
use swap_executor::adapters::persistence::JsonlJournal;
use swap_executor::config::{self, AppConfig};
use swap_executor::domain::amount::parse_raw_amount;
use swap_executor::domain::chain::{chain_name, explorer_tx_url};
use swap_executor::domain::error::TxError;
use swap_executor::domain::keys::KeyMaterial;
use swap_executor::usecases::{
    ApprovalFlow, ApprovalOutcome, ApprovalRequest, CancelHandle, ConsentGate, TransactionPipeline,
    cancel_channel,
};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.executor.log_level)),
        )
        .json()
        .with_writer(io::stderr)
        .init();

    config::loader::log_config_summary(&config);
    info!(
        name = %config.executor.name,
        version = env!("CARGO_PKG_VERSION"),
        chain_id = config.node.chain_id,
        chain = chain_name(config.node.chain_id).unwrap_or("unknown"),
        "Starting swap executor"
    );

    // ── 3. Signing key ──────────────────────────────────────
    let key = KeyMaterial::from_env("PRIVATE_KEY")
        .context("Failed to load signing key from env")?;

    // ── 4. RPC node ─────────────────────────────────────────
    let node = Arc::new(
        RpcNode::connect(&config.node)
            .await
            .context("Failed to connect to RPC node")?,
    );

    // ── 5. Pipeline (+ journal) ─────────────────────────────
    let mut pipeline = TransactionPipeline::new(
        Arc::clone(&node),
        config.transaction.gas_limit,
        config.confirmation.poll_policy(),
    )
    .with_progress(io::stderr());

    if config.journal.enabled {
        let journal = JsonlJournal::new(&config.journal.data_dir)
            .await
            .context("Failed to open transaction journal")?;
        pipeline = pipeline.with_journal(Arc::new(journal));
    }
    let pipeline = Arc::new(pipeline);

    // ── 6. Ctrl-C → cancel confirmation wait ────────────────
    let (cancel_handle, cancel) = cancel_channel();
    tokio::spawn(watch_interrupts(cancel_handle));

    // ── 7. Approval flow ────────────────────────────────────
    let request = approval_request(&config)?;
    let flow = ApprovalFlow::new(Arc::clone(&node), Arc::clone(&pipeline));
    let mut gate = ConsentGate::new(io::stdin().lock(), io::stdout());

    let outcome = flow.run(&request, &mut gate, &key, &cancel).await;
    drop(key);

    match outcome {
        Ok(ApprovalOutcome::AlreadySufficient { allowance }) => {
            info!(%allowance, "Allowance already sufficient, nothing to do");
        }
        Ok(ApprovalOutcome::Declined) => {
            info!("Approval declined, nothing was sent");
        }
        Ok(ApprovalOutcome::Approved { receipt }) => {
            let tx_hash = receipt.transaction_hash.to_string();
            info!(
                %tx_hash,
                block = receipt.block_number,
                explorer = %explorer_tx_url(request.chain_id, &tx_hash).unwrap_or_default(),
                "Approval confirmed"
            );
        }
        Err(e @ TxError::CancelledBeforeBroadcast { .. }) => {
            warn!(error = %e, "Interrupted before sending");
            return Err(e.into());
        }
        Err(e) if e.is_cancelled() => {
            warn!(error = %e, "Stopped waiting; the transaction may still be mined");
            return Err(e.into());
        }
        Err(e) => return Err(e).context("Approval failed"),
    }

    Ok(())
}

/// Build the approval request from validated config.
fn approval_request(config: &AppConfig) -> Result<ApprovalRequest> {
    let address = |field: &str, value: &str| -> Result<Address> {
        value
            .trim()
            .parse()
            .with_context(|| format!("{field} is not a valid address"))
    };

    Ok(ApprovalRequest {
        chain_id: config.node.chain_id,
        token: address("approval.token", &config.approval.token)?,
        spender: address("approval.spender", &config.approval.spender)?,
        wallet: address("approval.wallet", &config.approval.wallet)?,
        required: parse_raw_amount(&config.approval.required_allowance)?,
    })
}

/// First Ctrl-C cancels the confirmation wait, or the lifecycle if
/// nothing was sent yet; a second one exits.
///
/// The consent prompt reads stdin synchronously, so the second press is
/// the only way out of an unanswered prompt.
async fn watch_interrupts(cancel: CancelHandle) {
    if signal::ctrl_c().await.is_err() {
        return;
    }
    warn!("SIGINT received, cancelling confirmation wait (press again to exit)");
    cancel.cancel();

    if signal::ctrl_c().await.is_ok() {
        warn!("Second SIGINT received, exiting");
        std::process::exit(130);
    }
}

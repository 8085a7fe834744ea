//! Configuration Module - TOML-based Executor Configuration
//!
//! Loads and validates configuration from `config.toml`. Node endpoint,
//! polling policy, gas ceiling and the approval target are externalized
//! here. The signing key is never part of the file; it comes from the
//! `PRIVATE_KEY` environment variable.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

use crate::domain::chain::DEFAULT_GAS_LIMIT;
use crate::usecases::confirmation::PollPolicy;

/// Top-level executor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Executor identity and logging.
  pub executor: ExecutorConfig,
  /// JSON-RPC node endpoint.
  pub node: NodeConfig,
  /// Receipt polling policy.
  #[serde(default)]
  pub confirmation: ConfirmationConfig,
  /// Transaction construction parameters.
  #[serde(default)]
  pub transaction: TransactionConfig,
  /// Allowance the binary ensures on startup.
  pub approval: ApprovalConfig,
  /// Lifecycle journal.
  #[serde(default)]
  pub journal: JournalConfig,
}

/// Executor identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutorConfig {
  /// Human-readable instance name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Node endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
  /// HTTP(S) JSON-RPC URL. May embed an API key; never logged.
  pub rpc_url: String,
  /// Chain the endpoint must serve.
  pub chain_id: u64,
  /// Per-request timeout in seconds.
  #[serde(default = "default_timeout")]
  pub timeout_seconds: u64,
}

/// Receipt polling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmationConfig {
  /// Delay between receipt lookups (milliseconds).
  #[serde(default = "default_poll_interval")]
  pub poll_interval_ms: u64,
  /// Give up after this many seconds. Unset waits until mined or Ctrl-C.
  pub deadline_seconds: Option<u64>,
}

impl Default for ConfirmationConfig {
  fn default() -> Self {
    Self {
      poll_interval_ms: default_poll_interval(),
      deadline_seconds: None,
    }
  }
}

impl ConfirmationConfig {
  pub fn poll_policy(&self) -> PollPolicy {
    PollPolicy {
      interval: Duration::from_millis(self.poll_interval_ms),
      deadline: self.deadline_seconds.map(Duration::from_secs),
    }
  }
}

/// Transaction construction configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionConfig {
  /// Fixed gas ceiling for every transaction.
  #[serde(default = "default_gas_limit")]
  pub gas_limit: u64,
}

impl Default for TransactionConfig {
  fn default() -> Self {
    Self {
      gas_limit: default_gas_limit(),
    }
  }
}

/// Allowance target.
///
/// Addresses stay strings here and are parsed at startup so a typo is
/// reported with the offending field name.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalConfig {
  /// ERC-20 token contract.
  pub token: String,
  /// Contract allowed to move the tokens (aggregator router).
  pub spender: String,
  /// Token owner; must match the `PRIVATE_KEY` address.
  pub wallet: String,
  /// Minimum allowance needed, raw token units (decimal string).
  pub required_allowance: String,
}

/// Journal configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JournalConfig {
  /// Write lifecycle events to JSONL files.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Directory holding `journal/YYYY-MM-DD.jsonl`.
  #[serde(default = "default_data_dir")]
  pub data_dir: String,
}

impl Default for JournalConfig {
  fn default() -> Self {
    Self {
      enabled: default_true(),
      data_dir: default_data_dir(),
    }
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_timeout() -> u64 {
  30
}

fn default_poll_interval() -> u64 {
  1_000
}

fn default_gas_limit() -> u64 {
  DEFAULT_GAS_LIMIT
}

fn default_data_dir() -> String {
  "data".to_string()
}

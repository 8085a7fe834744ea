//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;
use crate::domain::amount::parse_raw_amount;
use crate::domain::chain::{VALID_CHAIN_IDS, chain_name};

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  parse_config(&content)
}

/// Log the loaded configuration. Loading itself is silent because it
/// runs before the subscriber exists; call this once tracing is up.
pub fn log_config_summary(config: &AppConfig) {
  info!(
    name = %config.executor.name,
    chain_id = config.node.chain_id,
    chain = chain_name(config.node.chain_id).unwrap_or("unknown"),
    gas_limit = config.transaction.gas_limit,
    journal = config.journal.enabled,
    "Configuration loaded successfully"
  );
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse config.toml")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - A supported chain and a non-empty RPC URL
/// - Positive timeouts, intervals and gas ceiling
/// - Parseable approval addresses and amount
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.executor.name.trim().is_empty(),
    "executor.name must not be empty"
  );

  // Node validation
  anyhow::ensure!(
    !config.node.rpc_url.trim().is_empty(),
    "node.rpc_url must not be empty"
  );
  anyhow::ensure!(
    VALID_CHAIN_IDS.contains(&config.node.chain_id),
    "node.chain_id {} is not a supported chain (expected one of {:?})",
    config.node.chain_id,
    VALID_CHAIN_IDS
  );
  anyhow::ensure!(
    config.node.timeout_seconds > 0,
    "node.timeout_seconds must be positive"
  );

  // Confirmation validation
  anyhow::ensure!(
    config.confirmation.poll_interval_ms > 0,
    "confirmation.poll_interval_ms must be positive"
  );
  if let Some(deadline) = config.confirmation.deadline_seconds {
    anyhow::ensure!(
      deadline.saturating_mul(1_000) >= config.confirmation.poll_interval_ms,
      "confirmation.deadline_seconds ({deadline}s) is shorter than one poll interval"
    );
  }

  // Transaction validation
  anyhow::ensure!(
    config.transaction.gas_limit >= 21_000,
    "transaction.gas_limit must be at least 21000, got {}",
    config.transaction.gas_limit
  );

  // Approval validation
  for (field, value) in [
    ("approval.token", &config.approval.token),
    ("approval.spender", &config.approval.spender),
    ("approval.wallet", &config.approval.wallet),
  ] {
    value
      .trim()
      .parse::<Address>()
      .with_context(|| format!("{field} is not a valid address: {value:?}"))?;
  }
  parse_raw_amount(&config.approval.required_allowance)
    .context("approval.required_allowance is not a raw integer amount")?;

  // Journal validation
  if config.journal.enabled {
    anyhow::ensure!(
      !config.journal.data_dir.trim().is_empty(),
      "journal.data_dir must not be empty when the journal is enabled"
    );
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::domain::chain::DEFAULT_GAS_LIMIT;

  const MINIMAL: &str = r#"
[executor]
name = "approve-usdc"

[node]
rpc_url = "https://polygon-rpc.example"
chain_id = 137

[approval]
token = "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359"
spender = "0x111111125421cA6dc452d289314280a0f8842A65"
wallet = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
required_allowance = "1000000"
"#;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_minimal_config_defaults() {
    let config = parse_config(MINIMAL).unwrap();
    assert_eq!(config.executor.log_level, "info");
    assert_eq!(config.node.timeout_seconds, 30);
    assert_eq!(config.transaction.gas_limit, DEFAULT_GAS_LIMIT);
    assert!(config.journal.enabled);

    let policy = config.confirmation.poll_policy();
    assert_eq!(policy.interval, Duration::from_secs(1));
    assert_eq!(policy.deadline, None);
  }

  #[test]
  fn test_deadline_is_mapped() {
    let text = format!("{MINIMAL}\n[confirmation]\npoll_interval_ms = 500\ndeadline_seconds = 120\n");
    let policy = parse_config(&text).unwrap().confirmation.poll_policy();
    assert_eq!(policy.interval, Duration::from_millis(500));
    assert_eq!(policy.deadline, Some(Duration::from_secs(120)));
  }

  #[test]
  fn test_unknown_chain_rejected() {
    let text = MINIMAL.replace("chain_id = 137", "chain_id = 31337");
    let err = parse_config(&text).unwrap_err();
    assert!(err.to_string().contains("31337"));
  }

  #[test]
  fn test_bad_spender_names_field() {
    let text = MINIMAL.replace(
      "0x111111125421cA6dc452d289314280a0f8842A65",
      "0x1111",
    );
    let err = parse_config(&text).unwrap_err();
    assert!(format!("{err:#}").contains("approval.spender"));
  }

  #[test]
  fn test_fractional_allowance_rejected() {
    let text = MINIMAL.replace("\"1000000\"", "\"1.5\"");
    assert!(parse_config(&text).is_err());
  }

  #[test]
  fn test_gas_limit_floor() {
    let text = format!("{MINIMAL}\n[transaction]\ngas_limit = 100\n");
    assert!(parse_config(&text).is_err());
  }

  #[derive(Clone, Default)]
  struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

  impl std::io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
      self.0.lock().unwrap().extend_from_slice(buf);
      Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
      Ok(())
    }
  }

  #[test]
  fn test_summary_is_logged_once_subscriber_is_installed() {
    let path = std::env::temp_dir().join(format!("swap-executor-config-{}.toml", std::process::id()));
    std::fs::write(&path, MINIMAL).unwrap();

    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
      .with_ansi(false)
      .with_writer(move || writer.clone())
      .finish();

    let config = tracing::subscriber::with_default(subscriber, || {
      let config = load_config(path.to_str().unwrap()).unwrap();
      assert!(log.0.lock().unwrap().is_empty(), "loading must not log");
      log_config_summary(&config);
      config
    });
    std::fs::remove_file(&path).ok();

    let out = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
    assert_eq!(config.node.chain_id, 137);
    assert!(out.contains("Configuration loaded successfully"));
    assert!(out.contains("chain_id=137"));
  }
}

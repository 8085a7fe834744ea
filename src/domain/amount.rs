//! Token amount scaling.
//!
//! Raw on-chain amounts are integers in the token's smallest unit.
//! Display divides by 10^decimals without going through floats, so
//! 18-decimal balances near `U256::MAX` render exactly.

use alloy::primitives::U256;

use super::error::{TxError, TxResult};

/// Parse a base-10 raw amount as returned by the quote API.
pub fn parse_raw_amount(input: &str) -> TxResult<U256> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TxError::InvalidAmount {
            input: input.to_string(),
            reason: "expected a base-10 unsigned integer".to_string(),
        });
    }
    U256::from_str_radix(trimmed, 10).map_err(|e| TxError::InvalidAmount {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Render `raw / 10^decimals` with trailing fractional zeros removed.
///
/// `scale_amount(10^18, 18) == "1"`, `scale_amount(1_500_000, 6) == "1.5"`.
pub fn scale_amount(raw: U256, decimals: u8) -> String {
    if decimals == 0 {
        return raw.to_string();
    }

    let width = usize::from(decimals);
    let (whole, fraction) = match U256::from(10u8).checked_pow(U256::from(decimals)) {
        Some(unit) => (raw / unit, raw % unit),
        // 10^decimals exceeds U256: every representable amount is < 1.
        None => (U256::ZERO, raw),
    };

    let fraction = format!("{:0>width$}", fraction.to_string());
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

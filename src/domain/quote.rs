//! Quote collaborator boundary.
//!
//! The REST quote/swap client lives outside this crate. These are the
//! pieces of its responses that consent rendering consumes.

use alloy::primitives::{Bytes, U256};
use serde::Deserialize;

use super::amount::parse_raw_amount;
use super::error::{TxError, TxResult};

/// Token metadata as reported by the quote API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub decimals: u8,
}

/// Quote/swap response subset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub from_token: TokenInfo,
    pub to_token: TokenInfo,
    /// Estimated output in the destination token's smallest unit.
    pub to_amount: String,
    /// Present on swap responses, absent on plain quotes.
    #[serde(default)]
    pub tx: Option<SwapTransaction>,
}

impl SwapQuote {
    pub fn estimated_amount_out(&self) -> TxResult<U256> {
        parse_raw_amount(&self.to_amount)
    }
}

/// Router call generated by the swap API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SwapTransaction {
    pub to: String,
    /// Hex calldata, `0x`-prefixed.
    pub data: String,
    /// Native value in wei, decimal string.
    #[serde(default)]
    pub value: String,
}

impl SwapTransaction {
    pub fn payload(&self) -> TxResult<Bytes> {
        self.data.parse::<Bytes>().map_err(|e| TxError::InvalidPayload {
            reason: format!("swap calldata is not hex ({e})"),
        })
    }

    /// Native value; an empty string means zero.
    pub fn value(&self) -> TxResult<U256> {
        if self.value.trim().is_empty() {
            return Ok(U256::ZERO);
        }
        parse_raw_amount(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_quote() {
        let json = r#"{
            "fromToken": {"symbol": "USDC", "name": "USD Coin", "address": "0xa0b8", "decimals": 6},
            "toToken": {"symbol": "DAI", "decimals": 18},
            "toAmount": "999500000000000000"
        }"#;
        let quote: SwapQuote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.from_token.symbol, "USDC");
        assert_eq!(quote.to_token.decimals, 18);
        assert_eq!(
            quote.estimated_amount_out().unwrap(),
            U256::from(999_500_000_000_000_000u64)
        );
        assert!(quote.tx.is_none());
    }

    #[test]
    fn test_deserialize_swap_transaction() {
        let json = r#"{
            "fromToken": {"symbol": "USDC", "decimals": 6},
            "toToken": {"symbol": "DAI", "decimals": 18},
            "toAmount": "1",
            "tx": {"from": "0x01", "to": "0x111111125421ca6dc452d289314280a0f8842a65", "data": "0x12aa3caf", "value": "0", "gas": 0}
        }"#;
        let quote: SwapQuote = serde_json::from_str(json).unwrap();
        let tx = quote.tx.unwrap();
        assert_eq!(tx.payload().unwrap(), Bytes::from(vec![0x12, 0xaa, 0x3c, 0xaf]));
        assert_eq!(tx.value().unwrap(), U256::ZERO);
    }

    #[test]
    fn test_bad_calldata() {
        let tx = SwapTransaction {
            to: String::new(),
            data: "0xzz".to_string(),
            value: String::new(),
        };
        assert!(matches!(tx.payload(), Err(TxError::InvalidPayload { .. })));
        assert_eq!(tx.value().unwrap(), U256::ZERO);
    }
}

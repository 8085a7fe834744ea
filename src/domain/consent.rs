//! Consent Rendering and Decision - Pure Side of the Consent Gate
//!
//! Summaries of irreversible actions are rendered here as plain strings
//! and user replies are mapped to a `ConsentDecision`. Nothing in this
//! module performs I/O; the blocking read lives in `usecases::consent`.

use std::fmt;
use std::fmt::Write as _;

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;

use super::amount::scale_amount;
use super::quote::TokenInfo;

/// The only reply that approves an action (compared case-insensitively).
pub const AFFIRMATIVE: &str = "y";

const LABEL_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentDecision {
    Approved,
    Declined,
}

impl ConsentDecision {
    /// Map one line of user input to a decision.
    ///
    /// Anything other than the affirmative token, empty input included,
    /// declines. There is no "invalid input" outcome.
    pub fn from_reply(reply: &str) -> Self {
        if reply.trim().to_lowercase() == AFFIRMATIVE {
            Self::Approved
        } else {
            Self::Declined
        }
    }

    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for ConsentDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved => f.write_str("approved"),
            Self::Declined => f.write_str("declined"),
        }
    }
}

/// How the router gets permission to move the sold token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionMode {
    Permit,
    ContractApproval,
}

impl fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permit => f.write_str("Permit1"),
            Self::ContractApproval => f.write_str("Contract approval"),
        }
    }
}

/// Everything shown to the user before a swap is broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapSummary {
    pub from_token: TokenInfo,
    pub to_token: TokenInfo,
    /// Sold amount, raw units of `from_token`.
    pub amount: U256,
    /// Estimated bought amount, raw units of `to_token`.
    pub estimated_amount_out: U256,
    /// Slippage tolerance in percent.
    pub slippage: Decimal,
    pub permission: PermissionMode,
}

/// Everything shown to the user before an unlimited approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalSummary {
    pub wallet: Address,
    pub token_symbol: String,
}

fn push_row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "    {label:<width$} {value}", width = LABEL_WIDTH);
}

fn push_amount_rows(out: &mut String, summary: &SwapSummary) {
    push_row(
        out,
        "Selling:",
        &format!(
            "{} {}",
            scale_amount(summary.amount, summary.from_token.decimals),
            summary.from_token.symbol
        ),
    );
    push_row(
        out,
        "Buying (estimation):",
        &format!(
            "{} {}",
            scale_amount(summary.estimated_amount_out, summary.to_token.decimals),
            summary.to_token.symbol
        ),
    );
    push_row(out, "Slippage:", &format!("{}%", summary.slippage.normalize()));
}

/// Summary + prompt shown before a swap is executed on-chain.
pub fn render_swap_prompt(summary: &SwapSummary) -> String {
    let mut out = String::from("Swap summary:\n");
    push_amount_rows(&mut out, summary);
    push_row(&mut out, "Permission type:", &summary.permission.to_string());
    out.push('\n');
    out.push_str(
        "WARNING: This swap will be executed onchain next. The results are irreversible. \
         Make sure the proposed trade looks correct before continuing!\n",
    );
    out.push_str("Would you like to execute this swap onchain now? [y/N]: ");
    out
}

/// Summary shown when swap calldata is only generated, not executed.
pub fn render_swap_preview(summary: &SwapSummary) -> String {
    let mut out = String::from("Swap summary:\n");
    push_amount_rows(&mut out, summary);
    out.push('\n');
    out.push_str(
        "WARNING: Executing the transaction data generated by this function is irreversible. \
         Make sure the proposed trade looks correct!\n",
    );
    out
}

/// Summary + prompt shown before an unlimited token approval.
pub fn render_approval_prompt(summary: &ApprovalSummary) -> String {
    let mut out = String::from(
        "The aggregator contract does not have enough allowance to execute this swap! \
         An unlimited approval can be posted on your behalf. If you would like to use a \
         custom approval amount instead, do that manually onchain, then run again\n",
    );
    out.push_str("Approval summary:\n");
    push_row(&mut out, "Wallet:", &summary.wallet.to_checksum(None));
    push_row(&mut out, "Swapping:", &summary.token_symbol);
    push_row(&mut out, "Approval amount:", "unlimited");
    out.push('\n');
    out.push_str("Would you like to post an onchain unlimited approval now? [y/N]: ");
    out
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn usdc() -> TokenInfo {
        TokenInfo {
            symbol: "USDC".to_string(),
            name: "USD Coin".to_string(),
            address: String::new(),
            decimals: 6,
        }
    }

    fn weth() -> TokenInfo {
        TokenInfo {
            symbol: "WETH".to_string(),
            name: "Wrapped Ether".to_string(),
            address: String::new(),
            decimals: 18,
        }
    }

    fn summary() -> SwapSummary {
        SwapSummary {
            from_token: usdc(),
            to_token: weth(),
            amount: U256::from(2_500_000u64),
            estimated_amount_out: U256::from(1_000_000_000_000_000u64),
            slippage: dec!(0.5),
            permission: PermissionMode::ContractApproval,
        }
    }

    #[test]
    fn test_affirmative_variants() {
        assert_eq!(ConsentDecision::from_reply("y"), ConsentDecision::Approved);
        assert_eq!(ConsentDecision::from_reply("Y"), ConsentDecision::Approved);
        assert_eq!(ConsentDecision::from_reply("  y \n"), ConsentDecision::Approved);
        assert_eq!(ConsentDecision::from_reply("Y\r\n"), ConsentDecision::Approved);
    }

    #[test]
    fn test_everything_else_declines() {
        for reply in ["", "\n", "n", "N", "yes", "yy", "no", "sure", " ", "y y"] {
            assert_eq!(
                ConsentDecision::from_reply(reply),
                ConsentDecision::Declined,
                "reply {reply:?} must decline"
            );
        }
    }

    #[test]
    fn test_swap_prompt_scales_amounts() {
        let rendered = render_swap_prompt(&summary());
        assert!(rendered.contains("2.5 USDC"));
        assert!(rendered.contains("0.001 WETH"));
        assert!(rendered.contains("0.5%"));
        assert!(rendered.contains("Contract approval"));
        assert!(rendered.ends_with("[y/N]: "));
    }

    #[test]
    fn test_swap_preview_has_no_prompt() {
        let rendered = render_swap_preview(&summary());
        assert!(rendered.contains("irreversible"));
        assert!(!rendered.contains("[y/N]"));
        assert!(!rendered.contains("Permission type"));
    }

    #[test]
    fn test_permit_label() {
        let mut s = summary();
        s.permission = PermissionMode::Permit;
        assert!(render_swap_prompt(&s).contains("Permit1"));
    }

    #[test]
    fn test_approval_prompt() {
        let rendered = render_approval_prompt(&ApprovalSummary {
            wallet: Address::repeat_byte(0x11),
            token_symbol: "USDC".to_string(),
        });
        assert!(rendered.contains("USDC"));
        assert!(rendered.contains("unlimited"));
        assert!(rendered.contains("0x1111111111111111111111111111111111111111"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        assert_eq!(render_swap_prompt(&summary()), render_swap_prompt(&summary()));
    }
}

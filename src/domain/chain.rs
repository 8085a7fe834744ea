//! Chain Constants - Chain IDs and Fee Model Selection
//!
//! Chain identifiers supported by the aggregator, the fixed gas-limit
//! ceiling applied to every transaction, and the chain → fee model
//! lookup. Pure data: no network access happens here.

use std::fmt;

/// Numeric EIP-155 chain identifier.
pub type ChainId = u64;

pub const ARBITRUM: ChainId = 42_161;
pub const AURORA: ChainId = 1_313_161_554;
pub const AVALANCHE: ChainId = 43_114;
pub const BASE: ChainId = 8_453;
pub const BSC: ChainId = 56;
pub const ETHEREUM: ChainId = 1;
pub const FANTOM: ChainId = 250;
pub const GNOSIS: ChainId = 100;
pub const KLAYTN: ChainId = 8_217;
pub const OPTIMISM: ChainId = 10;
pub const POLYGON: ChainId = 137;
pub const ZKSYNC_ERA: ChainId = 324;

/// Every chain id the aggregator serves.
pub const VALID_CHAIN_IDS: [ChainId; 12] = [
    ARBITRUM, AURORA, AVALANCHE, BASE, BSC, ETHEREUM, FANTOM, GNOSIS, KLAYTN, OPTIMISM, POLYGON,
    ZKSYNC_ERA,
];

/// Chains that receive a priority-fee (EIP-1559) envelope.
pub const DYNAMIC_FEE_CHAINS: [ChainId; 2] = [ETHEREUM, POLYGON];

/// Gas ceiling used for every transaction.
///
/// Placeholder value; far above what an approval or swap consumes.
/// Overridable through `[transaction].gas_limit`.
pub const DEFAULT_GAS_LIMIT: u64 = 21_000_000;

/// Fee market a chain's transactions are priced against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeeModel {
    /// Priority tip + fee cap (type-2 envelope).
    DynamicFee,
    /// Single gas price (legacy envelope, EIP-155 replay protected).
    Legacy,
}

impl FeeModel {
    /// Select the fee model for a chain.
    ///
    /// Unrecognized chain ids fall back to `Legacy`; this is the only
    /// place in the crate where an unknown input maps to a default.
    pub fn for_chain(chain_id: ChainId) -> Self {
        if DYNAMIC_FEE_CHAINS.contains(&chain_id) {
            Self::DynamicFee
        } else {
            Self::Legacy
        }
    }
}

impl fmt::Display for FeeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DynamicFee => f.write_str("dynamic-fee"),
            Self::Legacy => f.write_str("legacy"),
        }
    }
}

/// Human-readable chain name, if known.
pub fn chain_name(chain_id: ChainId) -> Option<&'static str> {
    let name = match chain_id {
        ARBITRUM => "Arbitrum",
        AURORA => "Aurora",
        AVALANCHE => "Avalanche",
        BASE => "Base",
        BSC => "BNB Chain",
        ETHEREUM => "Ethereum",
        FANTOM => "Fantom",
        GNOSIS => "Gnosis",
        KLAYTN => "Klaytn",
        OPTIMISM => "Optimism",
        POLYGON => "Polygon",
        ZKSYNC_ERA => "zkSync Era",
        _ => return None,
    };
    Some(name)
}

/// Block explorer link for a transaction hash.
pub fn explorer_tx_url(chain_id: ChainId, tx_hash: &str) -> Option<String> {
    let base = match chain_id {
        ARBITRUM => "https://arbiscan.io",
        AURORA => "https://explorer.mainnet.aurora.dev",
        AVALANCHE => "https://snowtrace.io",
        BASE => "https://basescan.org",
        BSC => "https://bscscan.com",
        ETHEREUM => "https://etherscan.io",
        FANTOM => "https://ftmscan.com",
        GNOSIS => "https://gnosisscan.io",
        KLAYTN => "https://klaytnscope.com",
        OPTIMISM => "https://optimistic.etherscan.io",
        POLYGON => "https://polygonscan.com",
        ZKSYNC_ERA => "https://explorer.zksync.io",
        _ => return None,
    };
    Some(format!("{base}/tx/{tx_hash}"))
}

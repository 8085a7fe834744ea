//! Chain Adapters - EVM Node Interaction Layer
//!
//! On-chain access via alloy-rs:
//! - RPC provider implementing the `NodeClient` port
//! - Fee suggestions per fee model (dynamic-fee or legacy)
//! - ERC-20 read calls and approval calldata
//! - Chain-scoped transaction signing

pub mod contracts;
pub mod gas;
pub mod provider;
pub mod signer;

pub use contracts::{ContractReader, ReadMethod, ReadValue};
pub use gas::GasOracle;
pub use provider::RpcNode;
pub use signer::TransactionSigner;

//! Token Contract Reads - ERC-20 / ERC-2612 Static Calls
//!
//! Packs the method selector and arguments for the standard token read
//! surface, issues an `eth_call` through the `NodeClient` port, and
//! decodes the typed return value. Also encodes `approve` calldata for
//! the approval flow. Purely read-only: nothing here signs or sends.

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::{SolCall, SolType, SolValue};
use tracing::{debug, instrument};

use crate::domain::error::{TxError, TxResult};
use crate::ports::node::NodeClient;

sol! {
    /// Token surface the executor reads and approves against.
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function nonces(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// One of the fixed read methods, with string arguments as supplied
/// by an operator. Arguments are validated while packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMethod<'a> {
    Name,
    Symbol,
    Decimals,
    Nonces { owner: &'a str },
    Allowance { owner: &'a str, spender: &'a str },
}

impl ReadMethod<'_> {
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Symbol => "symbol",
            Self::Decimals => "decimals",
            Self::Nonces { .. } => "nonces",
            Self::Allowance { .. } => "allowance",
        }
    }
}

/// Decoded return value of a read method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadValue {
    Text(String),
    Decimals(u8),
    Amount(U256),
}

impl fmt::Display for ReadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Decimals(d) => write!(f, "{d}"),
            Self::Amount(a) => write!(f, "{a}"),
        }
    }
}

fn pack_address(method: &'static str, raw: &str) -> TxResult<Address> {
    raw.trim().parse().map_err(|e| TxError::AbiEncode {
        method,
        reason: format!("argument {raw:?} is not an address: {e}"),
    })
}

/// Pack selector + arguments for a read method.
pub fn encode_read(method: &ReadMethod<'_>) -> TxResult<Bytes> {
    let name = method.method_name();
    let calldata = match *method {
        ReadMethod::Name => IERC20::nameCall {}.abi_encode(),
        ReadMethod::Symbol => IERC20::symbolCall {}.abi_encode(),
        ReadMethod::Decimals => IERC20::decimalsCall {}.abi_encode(),
        ReadMethod::Nonces { owner } => IERC20::noncesCall {
            owner: pack_address(name, owner)?,
        }
        .abi_encode(),
        ReadMethod::Allowance { owner, spender } => IERC20::allowanceCall {
            owner: pack_address(name, owner)?,
            spender: pack_address(name, spender)?,
        }
        .abi_encode(),
    };
    Ok(Bytes::from(calldata))
}

/// Calldata for `approve(spender, amount)`.
pub fn encode_approve(spender: Address, amount: U256) -> Bytes {
    Bytes::from(IERC20::approveCall { spender, amount }.abi_encode())
}

/// Read-only token contract client.
pub struct ContractReader<N: NodeClient> {
    node: Arc<N>,
}

impl<N: NodeClient> ContractReader<N> {
    pub fn new(node: Arc<N>) -> Self {
        Self { node }
    }

    /// Run any read method and decode its typed result.
    #[instrument(skip(self))]
    pub async fn read(&self, contract: Address, method: ReadMethod<'_>) -> TxResult<ReadValue> {
        let name = method.method_name();
        let calldata = encode_read(&method)?;
        let data = self.static_call(name, contract, calldata).await?;

        let value = match method {
            ReadMethod::Name | ReadMethod::Symbol => ReadValue::Text(decode(name, contract, &data)?),
            ReadMethod::Decimals => ReadValue::Decimals(decode_decimals(contract, &data)?),
            ReadMethod::Nonces { .. } | ReadMethod::Allowance { .. } => {
                ReadValue::Amount(decode(name, contract, &data)?)
            }
        };
        Ok(value)
    }

    pub async fn name(&self, contract: Address) -> TxResult<String> {
        let data = self
            .static_call("name", contract, IERC20::nameCall {}.abi_encode().into())
            .await?;
        decode("name", contract, &data)
    }

    /// Decoded against the `symbol` return type, never `name`.
    pub async fn symbol(&self, contract: Address) -> TxResult<String> {
        let data = self
            .static_call("symbol", contract, IERC20::symbolCall {}.abi_encode().into())
            .await?;
        decode("symbol", contract, &data)
    }

    pub async fn decimals(&self, contract: Address) -> TxResult<u8> {
        let data = self
            .static_call("decimals", contract, IERC20::decimalsCall {}.abi_encode().into())
            .await?;
        decode_decimals(contract, &data)
    }

    /// ERC-2612 permit nonce of `owner` (not the account nonce).
    pub async fn nonces(&self, contract: Address, owner: Address) -> TxResult<U256> {
        let calldata = IERC20::noncesCall { owner }.abi_encode();
        let data = self.static_call("nonces", contract, calldata.into()).await?;
        decode("nonces", contract, &data)
    }

    /// Remaining amount `spender` may move out of `owner`'s balance.
    #[instrument(skip(self))]
    pub async fn allowance(
        &self,
        contract: Address,
        owner: Address,
        spender: Address,
    ) -> TxResult<U256> {
        let calldata = IERC20::allowanceCall { owner, spender }.abi_encode();
        let data = self.static_call("allowance", contract, calldata.into()).await?;
        let allowance: U256 = decode("allowance", contract, &data)?;
        debug!(%allowance, "Allowance read");
        Ok(allowance)
    }

    async fn static_call(
        &self,
        method: &'static str,
        contract: Address,
        calldata: Bytes,
    ) -> TxResult<Bytes> {
        let data = self
            .node
            .call(contract, calldata)
            .await
            .map_err(|e| TxError::Call {
                method,
                contract,
                reason: format!("{e:#}"),
            })?;

        // A call to an address without code succeeds with empty output.
        if data.is_empty() {
            return Err(TxError::Call {
                method,
                contract,
                reason: "empty return data (no contract code at address?)".to_string(),
            });
        }
        Ok(data)
    }
}

fn decode<T>(
    method: &'static str,
    contract: Address,
    data: &[u8],
) -> TxResult<T>
where
    T: SolValue + From<<T::SolType as SolType>::RustType>,
{
    T::abi_decode(data).map_err(|e| TxError::AbiDecode {
        method,
        contract,
        reason: e.to_string(),
    })
}

/// `uint8` return word. Anything above 255 is a malformed return, not
/// a value to truncate.
fn decode_decimals(contract: Address, data: &[u8]) -> TxResult<u8> {
    let word: U256 = decode("decimals", contract, data)?;
    u8::try_from(word).map_err(|_| TxError::AbiDecode {
        method: "decimals",
        contract,
        reason: format!("return value {word} does not fit uint8"),
    })
}

#[cfg(test)]
mod tests {
    use mockall::predicate::*;

    use super::*;
    use crate::ports::node::MockNodeClient;

    fn token() -> Address {
        Address::repeat_byte(0xaa)
    }

    #[test]
    fn test_selectors_match_signatures() {
        use alloy::primitives::keccak256;
        assert_eq!(
            IERC20::allowanceCall::SELECTOR,
            keccak256(b"allowance(address,address)")[..4]
        );
        assert_eq!(IERC20::symbolCall::SELECTOR, keccak256(b"symbol()")[..4]);
        assert_eq!(
            IERC20::approveCall::SELECTOR,
            [0x09, 0x5e, 0xa7, 0xb3]
        );
    }

    #[test]
    fn test_encode_allowance_layout() {
        let owner = Address::repeat_byte(0x11);
        let spender = Address::repeat_byte(0x22);
        let calldata = encode_read(&ReadMethod::Allowance {
            owner: &owner.to_string(),
            spender: &spender.to_string(),
        })
        .unwrap();

        assert_eq!(calldata.len(), 4 + 32 + 32);
        assert_eq!(&calldata[..4], &IERC20::allowanceCall::SELECTOR);
        assert_eq!(&calldata[16..36], owner.as_slice());
        assert_eq!(&calldata[48..68], spender.as_slice());
    }

    #[test]
    fn test_encode_rejects_bad_argument() {
        let err = encode_read(&ReadMethod::Nonces { owner: "0xnothex" }).unwrap_err();
        assert!(matches!(err, TxError::AbiEncode { method: "nonces", .. }));
    }

    #[tokio::test]
    async fn test_allowance_round_trip() {
        let owner = Address::repeat_byte(0x11);
        let spender = Address::repeat_byte(0x22);
        let expected_calldata: Bytes = IERC20::allowanceCall { owner, spender }.abi_encode().into();
        let allowance = U256::from(123_456_789u64) << 100usize;

        let mut node = MockNodeClient::new();
        node.expect_call()
            .with(eq(token()), eq(expected_calldata))
            .times(1)
            .returning(move |_, _| Ok(allowance.abi_encode().into()));

        let reader = ContractReader::new(Arc::new(node));
        let read = reader.allowance(token(), owner, spender).await.unwrap();
        assert_eq!(read, allowance);
    }

    #[tokio::test]
    async fn test_symbol_uses_symbol_selector() {
        let mut node = MockNodeClient::new();
        node.expect_call()
            .withf(|_, data| data[..4] == IERC20::symbolCall::SELECTOR)
            .times(1)
            .returning(|_, _| Ok("USDC".to_string().abi_encode().into()));

        let reader = ContractReader::new(Arc::new(node));
        assert_eq!(reader.symbol(token()).await.unwrap(), "USDC");
    }

    #[tokio::test]
    async fn test_generic_read_decimals() {
        let mut node = MockNodeClient::new();
        node.expect_call()
            .withf(|_, data| data[..4] == IERC20::decimalsCall::SELECTOR)
            .returning(|_, _| Ok(U256::from(6u8).abi_encode().into()));

        let reader = ContractReader::new(Arc::new(node));
        let value = reader.read(token(), ReadMethod::Decimals).await.unwrap();
        assert_eq!(value, ReadValue::Decimals(6));
        assert_eq!(value.to_string(), "6");
    }

    #[tokio::test]
    async fn test_decimals_typed_read() {
        let mut node = MockNodeClient::new();
        node.expect_call()
            .returning(|_, _| Ok(U256::from(18u8).abi_encode().into()));

        let reader = ContractReader::new(Arc::new(node));
        assert_eq!(reader.decimals(token()).await.unwrap(), 18);
    }

    #[tokio::test]
    async fn test_decimals_out_of_range_is_decode_error() {
        let mut node = MockNodeClient::new();
        node.expect_call()
            .returning(|_, _| Ok(U256::from(256u64).abi_encode().into()));

        let reader = ContractReader::new(Arc::new(node));
        let err = reader.decimals(token()).await.unwrap_err();
        assert!(matches!(err, TxError::AbiDecode { method: "decimals", .. }));

        let err = reader.read(token(), ReadMethod::Decimals).await.unwrap_err();
        assert!(matches!(err, TxError::AbiDecode { method: "decimals", .. }));
    }

    #[tokio::test]
    async fn test_garbage_return_is_decode_error() {
        let mut node = MockNodeClient::new();
        node.expect_call()
            .returning(|_, _| Ok(Bytes::from(vec![0x01, 0x02, 0x03])));

        let reader = ContractReader::new(Arc::new(node));
        let err = reader.name(token()).await.unwrap_err();
        assert!(matches!(err, TxError::AbiDecode { method: "name", .. }));
    }

    #[tokio::test]
    async fn test_empty_return_is_call_error() {
        let mut node = MockNodeClient::new();
        node.expect_call().returning(|_, _| Ok(Bytes::new()));

        let reader = ContractReader::new(Arc::new(node));
        let err = reader.decimals(token()).await.unwrap_err();
        assert!(matches!(err, TxError::Call { method: "decimals", .. }));
    }

    #[tokio::test]
    async fn test_node_rejection_is_call_error() {
        let mut node = MockNodeClient::new();
        node.expect_call()
            .returning(|_, _| Err(anyhow::anyhow!("execution reverted")));

        let reader = ContractReader::new(Arc::new(node));
        let err = reader
            .nonces(token(), Address::repeat_byte(0x11))
            .await
            .unwrap_err();
        match err {
            TxError::Call { reason, .. } => assert!(reason.contains("execution reverted")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_encode_approve() {
        let spender = Address::repeat_byte(0x33);
        let calldata = encode_approve(spender, U256::MAX);
        assert_eq!(&calldata[..4], &IERC20::approveCall::SELECTOR);
        assert_eq!(&calldata[16..36], spender.as_slice());
        assert!(calldata[36..68].iter().all(|b| *b == 0xff));
    }
}

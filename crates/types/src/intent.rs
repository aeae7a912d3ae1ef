use crate::CallShape;
use alloy::{
    consensus::TxLegacy,
    primitives::{Address, Bytes, TxKind, B256, U256},
};

/// Selector for ERC-20 `transfer(address,uint256)`.
const ERC20_TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Errors raised while building a [`TxIntent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntentError {
    /// A required field was never set.
    #[error("intent field not set: {0}")]
    MissingField(&'static str),
    /// A field that must be positive was zero.
    #[error("intent field must be positive: {0}")]
    ZeroField(&'static str),
    /// The calldata does not match the declared call shape.
    #[error("calldata malformed for {shape:?}: {len} bytes")]
    MalformedCallData {
        /// The declared call shape.
        shape: CallShape,
        /// The actual calldata length.
        len: usize,
    },
}

/// A fully-specified logical transaction, immutable once built.
///
/// Construct via [`TxIntent::builder`], which validates that every field is
/// populated and that the calldata matches the declared [`CallShape`] before
/// an intent can exist.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TxIntent {
    chain_id: u64,
    from: Address,
    to: Address,
    value: U256,
    input: Bytes,
    gas_limit: u64,
    gas_price: u128,
    nonce: u64,
    shape: CallShape,
}

impl TxIntent {
    /// Start building an intent.
    pub const fn builder() -> TxIntentBuilder {
        TxIntentBuilder::new()
    }

    /// The chain id the transaction is bound to.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The sending account.
    pub const fn from(&self) -> Address {
        self.from
    }

    /// The target address.
    pub const fn to(&self) -> Address {
        self.to
    }

    /// The native value attached to the call.
    pub const fn value(&self) -> U256 {
        self.value
    }

    /// The calldata.
    pub const fn input(&self) -> &Bytes {
        &self.input
    }

    /// The fixed gas limit.
    pub const fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    /// The gas price applied for this run.
    pub const fn gas_price(&self) -> u128 {
        self.gas_price
    }

    /// The account nonce assigned to this transaction.
    pub const fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The declared call shape.
    pub const fn shape(&self) -> CallShape {
        self.shape
    }

    /// Render the intent as an unsigned legacy transaction.
    pub fn to_legacy(&self) -> TxLegacy {
        TxLegacy {
            chain_id: Some(self.chain_id),
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(self.to),
            value: self.value,
            input: self.input.clone(),
        }
    }
}

/// Builder for [`TxIntent`]. Every field must be set; [`build`] validates.
///
/// [`build`]: TxIntentBuilder::build
#[derive(Debug, Clone, Default)]
pub struct TxIntentBuilder {
    chain_id: Option<u64>,
    from: Option<Address>,
    to: Option<Address>,
    value: Option<U256>,
    input: Bytes,
    gas_limit: Option<u64>,
    gas_price: Option<u128>,
    nonce: Option<u64>,
    shape: Option<CallShape>,
}

impl TxIntentBuilder {
    /// Create an empty builder.
    pub const fn new() -> Self {
        Self {
            chain_id: None,
            from: None,
            to: None,
            value: None,
            input: Bytes::new(),
            gas_limit: None,
            gas_price: None,
            nonce: None,
            shape: None,
        }
    }

    /// Set the chain id.
    pub const fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Set the sender.
    pub const fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the target address.
    pub const fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    /// Set the attached native value.
    pub const fn value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the calldata.
    pub fn input(mut self, input: impl Into<Bytes>) -> Self {
        self.input = input.into();
        self
    }

    /// Set the gas limit.
    pub const fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Set the gas price.
    pub const fn gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    /// Set the nonce.
    pub const fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Declare the call shape.
    pub const fn shape(mut self, shape: CallShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Validate and produce the immutable [`TxIntent`].
    pub fn build(self) -> Result<TxIntent, IntentError> {
        let chain_id = self.chain_id.ok_or(IntentError::MissingField("chain_id"))?;
        let from = self.from.ok_or(IntentError::MissingField("from"))?;
        let to = self.to.ok_or(IntentError::MissingField("to"))?;
        let value = self.value.ok_or(IntentError::MissingField("value"))?;
        let gas_limit = self.gas_limit.ok_or(IntentError::MissingField("gas_limit"))?;
        let gas_price = self.gas_price.ok_or(IntentError::MissingField("gas_price"))?;
        let nonce = self.nonce.ok_or(IntentError::MissingField("nonce"))?;
        let shape = self.shape.ok_or(IntentError::MissingField("shape"))?;

        if gas_limit == 0 {
            return Err(IntentError::ZeroField("gas_limit"));
        }
        if gas_price == 0 {
            return Err(IntentError::ZeroField("gas_price"));
        }

        let malformed = match shape {
            CallShape::NativeTransfer => !self.input.is_empty(),
            CallShape::Erc20Transfer => {
                self.input.len() != 68 || self.input[..4] != ERC20_TRANSFER_SELECTOR
            }
            CallShape::ContractCall => false,
        };
        if malformed {
            return Err(IntentError::MalformedCallData { shape, len: self.input.len() });
        }

        Ok(TxIntent {
            chain_id,
            from,
            to,
            value,
            input: self.input,
            gas_limit,
            gas_price,
            nonce,
            shape,
        })
    }
}

/// A signed, broadcast-ready transaction.
///
/// The raw bytes are the EIP-2718 encoding produced by the signing
/// capability. The sender identity is trusted input from that capability and
/// is never re-derived from the signature here.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignedTx {
    from: Address,
    nonce: u64,
    hash: B256,
    raw: Bytes,
}

impl SignedTx {
    /// Create a new signed transaction from its parts.
    pub const fn new(from: Address, nonce: u64, hash: B256, raw: Bytes) -> Self {
        Self { from, nonce, hash, raw }
    }

    /// The sending account.
    pub const fn from(&self) -> Address {
        self.from
    }

    /// The account nonce.
    pub const fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The transaction hash.
    pub const fn hash(&self) -> B256 {
        self.hash
    }

    /// The raw encoded transaction.
    pub const fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Consume the transaction, returning the raw bytes.
    pub fn into_raw(self) -> Bytes {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn base_builder() -> TxIntentBuilder {
        TxIntent::builder()
            .chain_id(1)
            .from(address!("0x1111111111111111111111111111111111111111"))
            .to(address!("0x2222222222222222222222222222222222222222"))
            .value(U256::from(100))
            .gas_limit(21_000)
            .gas_price(120)
            .nonce(7)
            .shape(CallShape::NativeTransfer)
    }

    #[test]
    fn builds_a_native_transfer() {
        let intent = base_builder().build().unwrap();
        assert_eq!(intent.nonce(), 7);
        assert_eq!(intent.gas_price(), 120);
        assert!(intent.input().is_empty());
    }

    #[test]
    fn missing_nonce_is_rejected() {
        let mut builder = base_builder();
        builder.nonce = None;
        assert_eq!(builder.build().unwrap_err(), IntentError::MissingField("nonce"));
    }

    #[test]
    fn missing_value_is_rejected() {
        let mut builder = base_builder();
        builder.value = None;
        assert_eq!(builder.build().unwrap_err(), IntentError::MissingField("value"));
    }

    #[test]
    fn zero_gas_limit_is_rejected() {
        let err = base_builder().gas_limit(0).build().unwrap_err();
        assert_eq!(err, IntentError::ZeroField("gas_limit"));
    }

    #[test]
    fn native_transfer_with_calldata_is_malformed() {
        let err = base_builder().input(vec![0x01, 0x02]).build().unwrap_err();
        assert!(matches!(err, IntentError::MalformedCallData { shape: CallShape::NativeTransfer, len: 2 }));
    }

    #[test]
    fn erc20_transfer_requires_selector_and_length() {
        // Correct length, wrong selector.
        let mut data = vec![0u8; 68];
        data[0] = 0xde;
        let err = base_builder().shape(CallShape::Erc20Transfer).input(data).build().unwrap_err();
        assert!(matches!(err, IntentError::MalformedCallData { shape: CallShape::Erc20Transfer, .. }));

        // Correct selector and length passes.
        let mut data = vec![0u8; 68];
        data[..4].copy_from_slice(&ERC20_TRANSFER_SELECTOR);
        let intent = base_builder().shape(CallShape::Erc20Transfer).input(data).build().unwrap();
        assert_eq!(intent.shape(), CallShape::Erc20Transfer);
    }

    #[test]
    fn legacy_rendering_carries_all_fields() {
        let intent = base_builder().build().unwrap();
        let legacy = intent.to_legacy();
        assert_eq!(legacy.chain_id, Some(1));
        assert_eq!(legacy.nonce, 7);
        assert_eq!(legacy.gas_price, 120);
        assert_eq!(legacy.gas_limit, 21_000);
        assert_eq!(legacy.value, U256::from(100));
    }
}

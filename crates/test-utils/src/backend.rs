use alloy::{
    consensus::{Transaction, TxEnvelope},
    eips::eip2718::Decodable2718,
    primitives::{Address, Bytes, B256, U256},
};
use salvage_chain::{Broadcaster, ChainReader};
use salvage_types::SignedTx;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Selector for ERC-20 `balanceOf(address)`.
const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
/// Selector for ERC-20 `transfer(address,uint256)`.
const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Errors produced by the scripted backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScriptedError {
    /// A scripted transient read failure.
    #[error("scripted transient read failure")]
    Transient,
    /// The published bytes did not decode as a transaction envelope.
    #[error("failed to decode published transaction")]
    Decode,
    /// The published transaction's nonce did not match the account state.
    #[error("bad nonce: expected {expected}, got {got}")]
    BadNonce {
        /// The account's current nonce.
        expected: u64,
        /// The nonce the transaction carried.
        got: u64,
    },
    /// The sender cannot cover the transfer.
    #[error("insufficient funds")]
    InsufficientFunds,
    /// The backend does not model this call.
    #[error("unsupported call of {0} bytes")]
    UnsupportedCall(usize),
}

#[derive(Debug, Clone, Default)]
struct ScriptedState {
    gas_price: u128,
    block_number: u64,
    nonces: HashMap<Address, u64>,
    native: HashMap<Address, U256>,
    erc20: HashMap<(Address, Address), U256>,
    /// distributor => (token, beneficiary, amount); one-shot.
    claim_triggers: HashMap<Address, (Address, Address, U256)>,
    read_faults: u32,
    published: Vec<SignedTx>,
}

/// An in-memory chain for tests.
///
/// Reads and publishes behave like a node's: publishing advances the
/// sender's nonce, moves value, executes the toy effects (claim triggers,
/// ERC-20 transfers), and later reads observe the result. [`fork`] produces
/// an independent deep copy, which is exactly what a disposable forked node
/// is to the pipeline.
///
/// [`fork`]: ScriptedBackend::fork
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedBackend {
    /// A fresh, empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-copy the current state into an independent backend.
    pub fn fork(&self) -> Self {
        let state = self.state.lock().unwrap().clone();
        Self { state: Arc::new(Mutex::new(state)) }
    }

    /// Set the gas price.
    pub fn with_gas_price(self, gas_price: u128) -> Self {
        self.state.lock().unwrap().gas_price = gas_price;
        self
    }

    /// Set the chain head.
    pub fn with_block_number(self, block_number: u64) -> Self {
        self.state.lock().unwrap().block_number = block_number;
        self
    }

    /// Set an account nonce.
    pub fn with_nonce(self, account: Address, nonce: u64) -> Self {
        self.state.lock().unwrap().nonces.insert(account, nonce);
        self
    }

    /// Set a native balance.
    pub fn with_native(self, account: Address, balance: U256) -> Self {
        self.state.lock().unwrap().native.insert(account, balance);
        self
    }

    /// Set an ERC-20 balance.
    pub fn with_erc20(self, token: Address, holder: Address, balance: U256) -> Self {
        self.state.lock().unwrap().erc20.insert((token, holder), balance);
        self
    }

    /// Arm a one-shot claim trigger: any call to `distributor` credits
    /// `amount` of `token` to `beneficiary`.
    pub fn with_claim_trigger(
        self,
        distributor: Address,
        token: Address,
        beneficiary: Address,
        amount: U256,
    ) -> Self {
        self.state
            .lock()
            .unwrap()
            .claim_triggers
            .insert(distributor, (token, beneficiary, amount));
        self
    }

    /// Make the next `n` reads fail with a transient error.
    pub fn fail_next_reads(&self, n: u32) {
        self.state.lock().unwrap().read_faults = n;
    }

    /// Advance the chain head.
    pub fn advance_head(&self, blocks: u64) {
        self.state.lock().unwrap().block_number += blocks;
    }

    /// Change the gas price mid-scenario.
    pub fn set_gas_price(&self, gas_price: u128) {
        self.state.lock().unwrap().gas_price = gas_price;
    }

    /// Every transaction published so far, in order.
    pub fn published(&self) -> Vec<SignedTx> {
        self.state.lock().unwrap().published.clone()
    }

    /// Current ERC-20 balance.
    pub fn erc20_balance(&self, token: Address, holder: Address) -> U256 {
        self.state.lock().unwrap().erc20.get(&(token, holder)).copied().unwrap_or_default()
    }

    /// Current native balance.
    pub fn native_balance(&self, account: Address) -> U256 {
        self.state.lock().unwrap().native.get(&account).copied().unwrap_or_default()
    }

    /// Current account nonce.
    pub fn nonce_of(&self, account: Address) -> u64 {
        self.state.lock().unwrap().nonces.get(&account).copied().unwrap_or_default()
    }

    fn take_fault(&self) -> Result<(), ScriptedError> {
        let mut state = self.state.lock().unwrap();
        if state.read_faults > 0 {
            state.read_faults -= 1;
            return Err(ScriptedError::Transient);
        }
        Ok(())
    }
}

impl ChainReader for ScriptedBackend {
    type Error = ScriptedError;

    async fn gas_price(&self) -> Result<u128, Self::Error> {
        self.take_fault()?;
        Ok(self.state.lock().unwrap().gas_price)
    }

    async fn block_number(&self) -> Result<u64, Self::Error> {
        self.take_fault()?;
        Ok(self.state.lock().unwrap().block_number)
    }

    async fn nonce(&self, address: Address) -> Result<u64, Self::Error> {
        self.take_fault()?;
        Ok(self.nonce_of(address))
    }

    async fn balance(&self, address: Address) -> Result<U256, Self::Error> {
        self.take_fault()?;
        Ok(self.native_balance(address))
    }

    async fn call_uint(&self, to: Address, data: Bytes) -> Result<U256, Self::Error> {
        self.take_fault()?;
        if data.len() == 36 && data[..4] == BALANCE_OF_SELECTOR {
            let holder = Address::from_slice(&data[16..36]);
            return Ok(self.erc20_balance(to, holder));
        }
        Err(ScriptedError::UnsupportedCall(data.len()))
    }
}

impl Broadcaster for ScriptedBackend {
    type Error = ScriptedError;

    async fn publish(&self, tx: &SignedTx) -> Result<B256, Self::Error> {
        let envelope = TxEnvelope::decode_2718(&mut tx.raw().as_ref())
            .map_err(|_| ScriptedError::Decode)?;
        let from = tx.from();
        let to = envelope.to().ok_or(ScriptedError::UnsupportedCall(0))?;
        let value = envelope.value();
        let input = envelope.input().clone();

        let mut state = self.state.lock().unwrap();

        let expected = state.nonces.get(&from).copied().unwrap_or_default();
        if envelope.nonce() != expected {
            return Err(ScriptedError::BadNonce { expected, got: envelope.nonce() });
        }
        state.nonces.insert(from, expected + 1);

        if !value.is_zero() {
            let sender_balance = state.native.get(&from).copied().unwrap_or_default();
            if sender_balance < value {
                return Err(ScriptedError::InsufficientFunds);
            }
            state.native.insert(from, sender_balance - value);
            *state.native.entry(to).or_default() += value;
        }

        if let Some((token, beneficiary, amount)) = state.claim_triggers.remove(&to) {
            *state.erc20.entry((token, beneficiary)).or_default() += amount;
        } else if input.len() == 68 && input[..4] == TRANSFER_SELECTOR {
            let recipient = Address::from_slice(&input[16..36]);
            let amount = U256::from_be_slice(&input[36..68]);
            let held = state.erc20.get(&(to, from)).copied().unwrap_or_default();
            if held < amount {
                return Err(ScriptedError::InsufficientFunds);
            }
            state.erc20.insert((to, from), held - amount);
            *state.erc20.entry((to, recipient)).or_default() += amount;
        }

        state.published.push(tx.clone());
        Ok(tx.hash())
    }
}

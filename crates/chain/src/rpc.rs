use crate::{Broadcaster, ChainError, ChainReader};
use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, B256, U256},
    providers::{Provider, RootProvider},
    rpc::types::TransactionRequest,
};
use salvage_types::SignedTx;

/// [`ChainReader`] and [`Broadcaster`] over an alloy provider.
///
/// Point it at the live node or at a disposable forked node; the interface
/// is identical either way.
#[derive(Debug, Clone)]
pub struct RpcChain<P> {
    provider: P,
}

impl RpcChain<RootProvider> {
    /// Connect over HTTP.
    pub fn new_http(url: url::Url) -> Self {
        Self { provider: RootProvider::new_http(url) }
    }
}

impl<P> RpcChain<P> {
    /// Wrap an existing provider.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Get the underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: Provider> ChainReader for RpcChain<P> {
    type Error = ChainError;

    async fn gas_price(&self) -> Result<u128, Self::Error> {
        self.provider.get_gas_price().await.map_err(Into::into)
    }

    async fn block_number(&self) -> Result<u64, Self::Error> {
        self.provider.get_block_number().await.map_err(Into::into)
    }

    async fn nonce(&self, address: Address) -> Result<u64, Self::Error> {
        self.provider.get_transaction_count(address).await.map_err(Into::into)
    }

    async fn balance(&self, address: Address) -> Result<U256, Self::Error> {
        self.provider.get_balance(address).await.map_err(Into::into)
    }

    async fn call_uint(&self, to: Address, data: Bytes) -> Result<U256, Self::Error> {
        let request = TransactionRequest::default().with_to(to).with_input(data);
        let ret = self.provider.call(request).await?;
        if ret.len() != 32 {
            return Err(ChainError::BadUintReturn(ret.len()));
        }
        Ok(U256::from_be_slice(&ret))
    }
}

impl<P: Provider> Broadcaster for RpcChain<P> {
    type Error = ChainError;

    async fn publish(&self, tx: &SignedTx) -> Result<B256, Self::Error> {
        let pending = self.provider.send_raw_transaction(tx.raw()).await?;
        Ok(*pending.tx_hash())
    }
}

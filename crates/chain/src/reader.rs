use alloy::primitives::{Address, Bytes, B256, U256};
use core::future::Future;
use salvage_types::{NonceSeries, SignedTx};

/// Read-only chain queries the pipeline depends on.
///
/// Implementors serve either a live node or a disposable forked node; the
/// pipeline cannot tell the difference, which is what makes the dry-run /
/// commit duality a caller-side choice rather than duplicated logic.
pub trait ChainReader {
    /// The error type returned by read operations.
    type Error: core::error::Error + Send + Sync + 'static;

    /// The current gas price.
    fn gas_price(&self) -> impl Future<Output = Result<u128, Self::Error>> + Send;

    /// The current chain head number.
    fn block_number(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send;

    /// The current nonce of an account.
    fn nonce(&self, address: Address)
        -> impl Future<Output = Result<u64, Self::Error>> + Send;

    /// The native balance of an account.
    fn balance(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<U256, Self::Error>> + Send;

    /// Issue a view call expected to return a single uint256 word.
    fn call_uint(
        &self,
        to: Address,
        data: Bytes,
    ) -> impl Future<Output = Result<U256, Self::Error>> + Send;
}

/// Publishes signed transactions to a node.
///
/// Works against either a live node or a forked one, same interface. Publish
/// is a write: callers never retry it, because a retry with the same nonce
/// risks double-submission and a retry with a fresh nonce breaks the plan's
/// fixed ordering.
pub trait Broadcaster {
    /// The error type returned by publish operations.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Publish a signed transaction, returning its hash on acceptance.
    fn publish(
        &self,
        tx: &SignedTx,
    ) -> impl Future<Output = Result<B256, Self::Error>> + Send;
}

/// A full execution backend: reads plus publication.
///
/// This is the single seam the resolver runs against in both modes; the
/// caller decides whether a given backend is a fork or the live node.
pub trait Backend: ChainReader + Broadcaster {}

impl<T: ChainReader + Broadcaster> Backend for T {}

/// Check whether a plan's transactions landed, by comparing the account's
/// live nonce against the run the plan issued.
///
/// Only meaningful after the target block has passed; a `false` here is the
/// caller's `InclusionMissed` signal to rebuild from fresh reads.
pub async fn was_included<R: ChainReader>(
    reader: &R,
    series: &NonceSeries,
) -> Result<bool, R::Error> {
    let live = reader.nonce(series.account()).await?;
    Ok(live >= series.start() + series.issued())
}

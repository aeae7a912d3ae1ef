use alloy::transports::{RpcError, TransportErrorKind};

/// Errors returned by the alloy-backed [`RpcChain`].
///
/// Transport failures are the transient class the pipeline retries with
/// bounded backoff; everything else is fatal.
///
/// [`RpcChain`]: crate::RpcChain
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// An RPC transport error.
    #[error("chain read failed: {0}")]
    Transport(#[from] RpcError<TransportErrorKind>),
    /// A view call returned something other than a single uint256 word.
    #[error("call returned {0} bytes, expected a 32-byte uint word")]
    BadUintReturn(usize),
}

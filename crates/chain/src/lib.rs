//! Chain access for the salvage pipeline.
//!
//! Defines the read ([`ChainReader`]) and publish ([`Broadcaster`]) seams the
//! pipeline is generic over, and implements both on top of an alloy provider.
//! The same implementation serves the live node and the disposable forked
//! node used for dry runs; the caller selects which by endpoint.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod error;
pub use error::ChainError;

mod reader;
pub use reader::{was_included, Backend, Broadcaster, ChainReader};

mod retry;
pub use retry::{retry_read, RetryPolicy};

mod rpc;
pub use rpc::RpcChain;

//! Salvage bundle library.
//!
//! Contains the [`RescueBundle`] type, the [`BundleAssembler`] that fixes a
//! target block and inclusion window, and the `eth_sendBundle` JSON-RPC wire
//! envelope ([`BundleRequest`]).

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

mod assembler;
pub use assembler::BundleAssembler;

mod bundle;
pub use bundle::{RescueBundle, RescueBundleResponse};

mod wire;
pub use wire::{BundleRequest, WireError, ETH_SEND_BUNDLE};

//! Relay submission for salvage bundles.
//!
//! A relay is a private submission endpoint: it withholds the bundle from
//! the public transaction pool until inclusion, which is the whole defense
//! against a front-running adversary. Some relays additionally require the
//! sender to authenticate with a reputation-bound identity key; whether the
//! header is attached is decided per endpoint, not by a global flag.

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

mod auth;
pub use auth::{RelayAuth, FLASHBOTS_SIGNATURE_HEADER};

mod client;
pub use client::{RelayClient, RelayFanout};

mod error;
pub use error::{RelayError, Result};

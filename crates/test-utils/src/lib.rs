//! Test utilities for the salvage workspace.
//!
//! The centerpiece is [`ScriptedBackend`], an in-memory chain that applies
//! published transactions to toy state — native balances, ERC-20 balances,
//! and claim triggers that credit a balance when poked — so resolver tests
//! exercise real cumulative effects instead of canned return values.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    rustdoc::all
)]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod backend;
pub use backend::{ScriptedBackend, ScriptedError};

mod scenario;
pub use scenario::{make_wallet, RescueScenario, DISTRIBUTOR, SAFE, TOKEN};

/// Install a test-writer tracing subscriber, once per process.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

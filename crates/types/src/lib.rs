//! Types and configuration used throughout the salvage SDK.

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

mod config;
pub use config::{env_utils, ConfigError, RescueConfig};

mod gas;
pub use gas::{CallShape, GasPolicy, GasTable};

mod intent;
pub use intent::{IntentError, SignedTx, TxIntent, TxIntentBuilder};

mod nonce;
pub use nonce::NonceSeries;

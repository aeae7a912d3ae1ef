//! The salvage orchestration pipeline.
//!
//! This crate holds the core of the system: the typed step model, the
//! dependency resolver that derives amounts only knowable after earlier
//! steps have been applied, the transaction builder that turns resolved
//! intents into signed transactions, and the [`Rescue`] orchestrator that
//! drives resolve → assemble → authenticate → submit end to end.
//!
//! The resolver runs the same logic in dry-run and commit mode against
//! interchangeable backends; the dry run validates the whole chain of
//! dependent amounts on a disposable fork, and the commit pass re-observes
//! every dependent amount immediately before bundle assembly so that a
//! drifted chain aborts the attempt instead of corrupting it.

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

mod builder;
pub use builder::sign_intent;

mod error;
pub use error::PipelineError;

mod resolver;
pub use resolver::{DependencyResolver, Mode, Resolution, StepSigners};

mod rescue;
pub use rescue::{Rescue, RescueReceipt};

mod step;
pub use step::{Amount, CallKind, Probe, Step, StepOutcome, StepSender};

use alloy::primitives::{Address, U256};
use salvage_relay::RelayError;
use salvage_types::{ConfigError, IntentError};

/// Errors that abort a rescue pipeline.
///
/// Every fatal condition aborts the in-flight run immediately and discards
/// all in-memory signed transactions; nonces and dependent amounts are only
/// valid for the state snapshot they were computed from, so nothing
/// partially built is ever reused across attempts. Each variant names the
/// step and the amounts/addresses involved — this is a high-stakes,
/// time-critical operation and the operator needs an audit trail. Key
/// material never appears here.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// Configuration failed validation; nothing touched the chain.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A step produced an intent that failed validation.
    #[error("invalid intent at step {step}: {source}")]
    InvalidIntent {
        /// The step that failed.
        step: &'static str,
        /// The underlying validation failure.
        source: IntentError,
    },

    /// The signing capability refused a transaction.
    #[error("signing failed at step {step}: {source}")]
    Signing {
        /// The step that failed.
        step: &'static str,
        /// The signer error.
        source: alloy::signers::Error,
    },

    /// A chain read kept failing after bounded retries.
    #[error("chain read failed at step {step}: {source}")]
    ChainRead {
        /// The step that failed, or `"plan"` for the seeding reads.
        step: &'static str,
        /// The backend error.
        source: Box<dyn core::error::Error + Send + Sync>,
    },

    /// A dependent amount resolved to zero where a positive amount is
    /// required: there is nothing to rescue.
    #[error("nothing to rescue at step {step}: observed {observed} at {source_address}")]
    InsufficientBalance {
        /// The step that failed.
        step: &'static str,
        /// The observed amount.
        observed: U256,
        /// The contract or account the observation came from.
        source_address: Address,
    },

    /// A commit-time observation deviated materially from the dry-run
    /// estimate: chain state moved, abort and rebuild.
    #[error(
        "simulation mismatch at step {step}: dry-run estimated {estimate}, commit observed {observed}"
    )]
    SimulationMismatch {
        /// The step that failed.
        step: &'static str,
        /// The dry-run estimate.
        estimate: U256,
        /// The commit-time observation.
        observed: U256,
    },

    /// Commit mode ran without dry-run estimates for a dependent step.
    #[error("step {step} has no dry-run estimate to commit against")]
    MissingEstimate {
        /// The dependent step.
        step: &'static str,
    },

    /// Publishing a signed transaction to the backend failed. Never
    /// retried: a same-nonce retry risks double-submission and a fresh-nonce
    /// retry breaks the fixed order.
    #[error("publish failed at step {step}: {source}")]
    Publish {
        /// The step that failed.
        step: &'static str,
        /// The backend error.
        source: Box<dyn core::error::Error + Send + Sync>,
    },

    /// The relay rejected the bundle. Fatal for this attempt; a caller may
    /// rebuild from fresh reads as a brand-new attempt.
    #[error("bundle submission rejected: {0}")]
    Submission(#[from] RelayError),

    /// The pipeline was cancelled between steps; nothing was submitted.
    #[error("pipeline cancelled before step {step}")]
    Cancelled {
        /// The step that would have run next.
        step: &'static str,
    },
}

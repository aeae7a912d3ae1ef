use crate::{builder::sign_intent, Amount, PipelineError, Step, StepOutcome, StepSender};
use alloy::{
    primitives::{Address, U256},
    signers::SignerSync,
};
use salvage_chain::{retry_read, Backend, Broadcaster, ChainReader, RetryPolicy};
use salvage_types::{GasPolicy, GasTable, NonceSeries, RescueConfig, SignedTx};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// The signing capabilities behind the two accounts a rescue touches.
#[derive(Debug, Clone)]
pub struct StepSigners<S> {
    rescuer: S,
    compromised: S,
}

impl<S> StepSigners<S> {
    /// Pair the rescuer's and the compromised account's signers.
    pub const fn new(rescuer: S, compromised: S) -> Self {
        Self { rescuer, compromised }
    }

    /// The signer for a step's sender.
    pub const fn for_sender(&self, sender: StepSender) -> &S {
        match sender {
            StepSender::Rescuer => &self.rescuer,
            StepSender::Compromised => &self.compromised,
        }
    }
}

/// Resolution mode for one pass over the plan.
///
/// Both modes run the identical step logic against whatever backend the
/// caller wires in — that is the simulate-then-commit duality. A dry run
/// validates the whole chain of dependent amounts on a disposable fork and
/// its results are discarded apart from the estimates. A commit pass runs
/// against a fresh copy of current state immediately before assembly,
/// re-observing every dependent amount and aborting on material drift; its
/// transactions are the ones the bundle carries.
#[derive(Debug, Clone, Copy)]
pub enum Mode<'a> {
    /// Validate against a disposable fork; results feed nothing but
    /// estimates.
    DryRun,
    /// Re-observe against current state, cross-checking each dependent
    /// amount against the dry-run estimates (indexed by step position).
    Commit {
        /// Per-step dry-run observations.
        estimates: &'a [Option<U256>],
    },
}

/// Everything one resolution pass produced.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The gas policy derived from this pass's chain reads.
    pub gas_policy: GasPolicy,
    /// The signed transactions, in declared step order.
    pub txs: Vec<SignedTx>,
    /// The audited per-step records, in the same order.
    pub outcomes: Vec<StepOutcome>,
    /// The rescuer's nonce run for this pass.
    pub rescuer_nonces: NonceSeries,
    /// The compromised account's nonce run for this pass.
    pub compromised_nonces: NonceSeries,
}

impl Resolution {
    /// Per-step observations, aligned with step positions, for a later
    /// commit pass to check against.
    pub fn estimates(&self) -> Vec<Option<U256>> {
        self.outcomes.iter().map(|outcome| outcome.observed).collect()
    }
}

/// Resolves a rescue plan step by step, in declared order.
///
/// Nonces are read once per pass and advanced locally; the gas price is read
/// once per pass and scaled by the configured bump. Chain reads retry with
/// bounded backoff; publishes never do.
#[derive(Debug, Clone)]
pub struct DependencyResolver<S> {
    chain_id: u64,
    gas_bump_percent: u128,
    gas_table: GasTable,
    tolerance_bps: u64,
    rescuer: Address,
    compromised: Address,
    signers: StepSigners<S>,
    retry: RetryPolicy,
    cancel: CancellationToken,
}

impl<S> DependencyResolver<S> {
    /// Build a resolver from validated configuration and signers.
    pub fn new(config: &RescueConfig, signers: StepSigners<S>) -> Self {
        Self {
            chain_id: config.chain_id,
            gas_bump_percent: config.gas_bump_percent,
            gas_table: config.gas_table,
            tolerance_bps: config.mismatch_tolerance_bps,
            rescuer: config.rescuer,
            compromised: config.compromised,
            signers,
            retry: RetryPolicy::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Override the read retry policy.
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Attach a cancellation token, checked between steps. Cancelling
    /// discards built intents; nothing partial is ever submitted.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn check_drift(
        &self,
        step: &'static str,
        estimate: U256,
        observed: U256,
    ) -> Result<(), PipelineError> {
        let diff = if observed >= estimate { observed - estimate } else { estimate - observed };
        let allowed = estimate
            .checked_mul(U256::from(self.tolerance_bps))
            .map(|scaled| scaled / U256::from(10_000))
            .unwrap_or_else(|| estimate / U256::from(10_000) * U256::from(self.tolerance_bps));
        if diff > allowed {
            return Err(PipelineError::SimulationMismatch { step, estimate, observed });
        }
        Ok(())
    }
}

impl<S: SignerSync> DependencyResolver<S> {
    /// Run one pass over the plan against a backend.
    ///
    /// Each step is resolved, built with the sender's next local nonce,
    /// signed, and applied to the backend so later probes see its cumulative
    /// effect. Steps run in exactly their declared order.
    #[instrument(skip_all, fields(mode = ?mode, steps = plan.len()))]
    pub async fn resolve<B: Backend>(
        &self,
        backend: &B,
        mode: Mode<'_>,
        plan: &[Step],
    ) -> Result<Resolution, PipelineError> {
        // Seed reads share no ordering dependency, so issue them together.
        let (gas_price, rescuer_nonce, compromised_nonce) = tokio::join!(
            retry_read(&self.retry, "gas_price", || backend.gas_price()),
            retry_read(&self.retry, "rescuer_nonce", || backend.nonce(self.rescuer)),
            retry_read(&self.retry, "compromised_nonce", || backend.nonce(self.compromised)),
        );
        let gas_policy = GasPolicy::new(plan_read(gas_price)?, self.gas_bump_percent);
        let mut rescuer_nonces = NonceSeries::new(self.rescuer, plan_read(rescuer_nonce)?);
        let mut compromised_nonces =
            NonceSeries::new(self.compromised, plan_read(compromised_nonce)?);

        let mut txs = Vec::with_capacity(plan.len());
        let mut outcomes = Vec::with_capacity(plan.len());

        for (index, step) in plan.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(PipelineError::Cancelled { step: step.label() });
            }

            let (amount, observed) = match step.amount() {
                Amount::Fixed(value) => (*value, None),
                Amount::GasStipend { gas_limit } => {
                    (U256::from(gas_policy.stipend_cost(*gas_limit)), None)
                }
                Amount::Observed(probe) => {
                    let value = retry_read(&self.retry, step.label(), || probe.read(backend))
                        .await
                        .map_err(|e| PipelineError::ChainRead {
                            step: step.label(),
                            source: Box::new(e),
                        })?;

                    if let Mode::Commit { estimates } = mode {
                        let estimate = estimates
                            .get(index)
                            .copied()
                            .flatten()
                            .ok_or(PipelineError::MissingEstimate { step: step.label() })?;
                        self.check_drift(step.label(), estimate, value)?;
                    }

                    if value.is_zero() {
                        return Err(PipelineError::InsufficientBalance {
                            step: step.label(),
                            observed: value,
                            source_address: probe.source_address(),
                        });
                    }
                    (value, Some(value))
                }
            };

            let (from, series) = match step.sender() {
                StepSender::Rescuer => (self.rescuer, &mut rescuer_nonces),
                StepSender::Compromised => (self.compromised, &mut compromised_nonces),
            };
            let nonce = series.take();

            let intent = step
                .intent(self.chain_id, from, nonce, amount, &gas_policy, &self.gas_table)
                .map_err(|source| PipelineError::InvalidIntent { step: step.label(), source })?;
            let signed = sign_intent(&intent, self.signers.for_sender(step.sender()))
                .map_err(|source| PipelineError::Signing { step: step.label(), source })?;

            // Apply to the backend so the next step's probe sees this one.
            backend
                .publish(&signed)
                .await
                .map_err(|e| PipelineError::Publish { step: step.label(), source: Box::new(e) })?;

            debug!(step = step.label(), %amount, nonce, tx_hash = %signed.hash(), "resolved step");

            outcomes.push(StepOutcome {
                label: step.label(),
                sender: from,
                target: step.call().target(),
                amount,
                observed,
                nonce,
                tx_hash: signed.hash(),
            });
            txs.push(signed);
        }

        Ok(Resolution { gas_policy, txs, outcomes, rescuer_nonces, compromised_nonces })
    }
}

/// Box a failed seed read into the pipeline taxonomy.
fn plan_read<T, E>(result: Result<T, E>) -> Result<T, PipelineError>
where
    E: core::error::Error + Send + Sync + 'static,
{
    result.map_err(|e| PipelineError::ChainRead { step: "plan", source: Box::new(e) })
}

use crate::{
    Amount, CallKind, DependencyResolver, Mode, PipelineError, Probe, Resolution, Step,
    StepOutcome, StepSender, StepSigners,
};
use alloy::{
    primitives::B256,
    signers::{Signer, SignerSync},
};
use chrono::Utc;
use salvage_bundle::{BundleAssembler, BundleRequest};
use salvage_chain::{retry_read, was_included, Backend, ChainReader, RetryPolicy};
use salvage_relay::RelayFanout;
use salvage_types::{ConfigError, NonceSeries, RescueConfig};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// The end-to-end rescue orchestrator.
///
/// Drives one attempt: dry-run the plan on a disposable fork, re-resolve in
/// commit mode against a fresh copy of current state, assemble the bundle
/// against a freshly-read head, and submit it through the relay. A failed or
/// missed attempt is never patched up — the caller starts a brand-new
/// attempt, which re-derives nonces, gas price, block number, and every
/// dependent amount.
#[derive(Debug, Clone)]
pub struct Rescue<S> {
    config: RescueConfig,
    plan: Vec<Step>,
    resolver: DependencyResolver<S>,
    assembler: BundleAssembler,
}

impl<S> Rescue<S>
where
    S: Signer + SignerSync,
{
    /// Build an orchestrator from configuration and the two signing
    /// capabilities.
    ///
    /// Validation is eager: a bad config or a signer that does not control
    /// its configured address fails here, before anything touches the chain.
    pub fn new(config: RescueConfig, rescuer: S, compromised: S) -> Result<Self, PipelineError> {
        config.validate()?;
        if rescuer.address() != config.rescuer {
            return Err(ConfigError::invalid(
                "rescuer",
                "signer does not control the configured rescuer address",
            )
            .into());
        }
        if compromised.address() != config.compromised {
            return Err(ConfigError::invalid(
                "compromised",
                "signer does not control the configured compromised address",
            )
            .into());
        }

        let resolver = DependencyResolver::new(&config, StepSigners::new(rescuer, compromised));
        let mut assembler = BundleAssembler::new();
        if let Some(window) = config.max_window_secs {
            assembler = assembler.with_window_secs(window);
        }
        let plan = default_plan(&config);

        Ok(Self { config, plan, resolver, assembler })
    }

    /// The configuration this orchestrator runs under.
    pub const fn config(&self) -> &RescueConfig {
        &self.config
    }

    /// The plan, in execution order.
    pub fn plan(&self) -> &[Step] {
        &self.plan
    }

    /// Replace the default plan with a custom step sequence.
    pub fn with_plan(mut self, plan: Vec<Step>) -> Self {
        self.plan = plan;
        self
    }

    /// Attach a cancellation token, checked between steps.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.resolver = self.resolver.with_cancellation(cancel);
        self
    }

    /// Override the read retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.resolver = self.resolver.with_retry_policy(retry);
        self
    }

    /// Validate the whole chain of dependent amounts on a disposable fork
    /// without committing anything.
    pub async fn dry_run<B: Backend>(&self, fork: &B) -> Result<Resolution, PipelineError> {
        self.resolver.resolve(fork, Mode::DryRun, &self.plan).await
    }

    /// Resolve both passes and assemble the bundle, without submitting.
    ///
    /// `dry` is the disposable fork for the validation pass; `commit` is a
    /// fresh copy of current state for the authoritative pass; `live` is
    /// the live node the target head is read from at assembly time.
    pub async fn prepare<D, C, L>(
        &self,
        dry: &D,
        commit: &C,
        live: &L,
    ) -> Result<(BundleRequest, Resolution), PipelineError>
    where
        D: Backend,
        C: Backend,
        L: ChainReader,
    {
        let estimates = self.dry_run(dry).await?.estimates();
        let resolution =
            self.resolver.resolve(commit, Mode::Commit { estimates: &estimates }, &self.plan).await?;

        // The head is read here, not at pipeline start: resolution takes
        // long enough for the chain to move.
        let head = retry_read(&RetryPolicy::default(), "head", || live.block_number())
            .await
            .map_err(|e| PipelineError::ChainRead { step: "assembly", source: Box::new(e) })?;
        let now = Utc::now().timestamp() as u64;

        let bundle = self.assembler.assemble(head, now, resolution.txs.clone());
        Ok((BundleRequest::new(bundle), resolution))
    }

    /// Run one full attempt: resolve, assemble, authenticate, submit.
    #[instrument(skip_all)]
    pub async fn execute<D, C, L, RS>(
        &self,
        dry: &D,
        commit: &C,
        live: &L,
        relay: &RelayFanout<RS>,
    ) -> Result<RescueReceipt, PipelineError>
    where
        D: Backend,
        C: Backend,
        L: ChainReader,
        RS: Signer + SignerSync,
    {
        let (request, resolution) = self.prepare(dry, commit, live).await?;
        let target_block = request.bundle().block_number();

        info!(target_block, txs = resolution.txs.len(), "submitting rescue bundle");
        let ack = relay.submit_bundle(&request).await?;

        Ok(RescueReceipt {
            target_block,
            bundle_hash: ack.bundle_hash,
            outcomes: resolution.outcomes,
            rescuer_nonces: resolution.rescuer_nonces,
            compromised_nonces: resolution.compromised_nonces,
        })
    }
}

/// The record of one submitted attempt.
///
/// Submission is acceptance for consideration, not inclusion — after the
/// target block passes, [`check_inclusion`] answers whether the plan's
/// transactions actually landed. A `false` is the caller's signal to run a
/// completely fresh attempt, never to resubmit this one.
///
/// [`check_inclusion`]: RescueReceipt::check_inclusion
#[derive(Debug, Clone)]
pub struct RescueReceipt {
    /// The block the bundle targeted.
    pub target_block: u64,
    /// The bundle hash the relay acknowledged.
    pub bundle_hash: B256,
    /// The audited per-step records.
    pub outcomes: Vec<StepOutcome>,
    /// The rescuer's nonce run.
    pub rescuer_nonces: NonceSeries,
    /// The compromised account's nonce run.
    pub compromised_nonces: NonceSeries,
}

impl RescueReceipt {
    /// Check against live state whether every planned transaction landed.
    pub async fn check_inclusion<R: ChainReader>(&self, live: &R) -> Result<bool, R::Error> {
        Ok(was_included(live, &self.compromised_nonces).await?
            && was_included(live, &self.rescuer_nonces).await?)
    }
}

/// The canonical rescue shape: fund gas, trigger the claim, sweep the asset.
///
/// Step three is the dependent one — the sweep amount only exists after the
/// first two steps have been applied, so it is observed, never configured.
pub(crate) fn default_plan(config: &RescueConfig) -> Vec<Step> {
    vec![
        Step::new(
            "fund_gas",
            StepSender::Rescuer,
            CallKind::Transfer { to: config.compromised },
            Amount::GasStipend { gas_limit: config.gas_fill_limit },
        ),
        Step::new(
            "trigger_claim",
            StepSender::Compromised,
            CallKind::Call { to: config.distributor, data: config.claim_calldata.clone() },
            Amount::Fixed(alloy::primitives::U256::ZERO),
        ),
        Step::new(
            "sweep_asset",
            StepSender::Compromised,
            CallKind::Erc20Transfer {
                token: config.asset_token,
                recipient: config.safe_recipient,
            },
            Amount::Observed(Probe::Erc20Balance {
                token: config.asset_token,
                holder: config.compromised,
            }),
        ),
    ]
}

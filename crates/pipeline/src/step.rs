use alloy::{
    primitives::{Address, Bytes, B256, U256},
    sol,
    sol_types::SolCall,
};
use salvage_chain::ChainReader;
use salvage_types::{CallShape, GasPolicy, GasTable, IntentError, TxIntent};

sol! {
    /// The ERC-20 surface the pipeline touches.
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function balanceOf(address owner) external view returns (uint256);
    }
}

/// Which account signs a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSender {
    /// The uncompromised account funding the rescue.
    Rescuer,
    /// The compromised account assets are extracted from.
    Compromised,
}

/// A chain read that yields the amount for a dependent step.
///
/// Observations are volatile: they are issued against the active backend
/// immediately before the step that consumes them, and never cached across
/// pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// ERC-20 `balanceOf(holder)` on `token`.
    Erc20Balance {
        /// The token contract.
        token: Address,
        /// The account whose balance is read.
        holder: Address,
    },
    /// Native balance of `holder`.
    NativeBalance {
        /// The account whose balance is read.
        holder: Address,
    },
    /// An arbitrary view call returning a single uint256 word.
    UintCall {
        /// The contract to call.
        target: Address,
        /// The calldata.
        data: Bytes,
    },
}

impl Probe {
    /// Issue the read against a backend.
    pub async fn read<R: ChainReader>(&self, reader: &R) -> Result<U256, R::Error> {
        match self {
            Self::Erc20Balance { token, holder } => {
                let data = IERC20::balanceOfCall { owner: *holder }.abi_encode();
                reader.call_uint(*token, data.into()).await
            }
            Self::NativeBalance { holder } => reader.balance(*holder).await,
            Self::UintCall { target, data } => reader.call_uint(*target, data.clone()).await,
        }
    }

    /// The contract or account the observation comes from, for reporting.
    pub const fn source_address(&self) -> Address {
        match self {
            Self::Erc20Balance { token, .. } => *token,
            Self::NativeBalance { holder } => *holder,
            Self::UintCall { target, .. } => *target,
        }
    }
}

/// How a step's amount is determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Amount {
    /// Known at plan time.
    Fixed(U256),
    /// The gas-to-fill policy constant: applied gas price times a flat
    /// allowance, not a measurement of the downstream transaction's true
    /// cost. Can undershoot under a fee spike; the gas bump is the knob
    /// that absorbs drift.
    GasStipend {
        /// The flat gas allowance.
        gas_limit: u64,
    },
    /// Observed from chain state after the preceding steps have applied.
    /// Zero observations abort the pipeline: there is nothing to rescue.
    Observed(Probe),
}

/// The call a step makes, and where its resolved amount lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallKind {
    /// Native transfer; the amount is the attached value.
    Transfer {
        /// The recipient.
        to: Address,
    },
    /// ERC-20 `transfer(recipient, amount)`; the amount is a calldata
    /// argument and no native value is attached.
    Erc20Transfer {
        /// The token contract the call targets.
        token: Address,
        /// The transfer recipient.
        recipient: Address,
    },
    /// A contract call with fixed calldata; the amount rides as the
    /// attached value.
    Call {
        /// The contract to call.
        to: Address,
        /// The calldata.
        data: Bytes,
    },
}

impl CallKind {
    /// The call shape, for the gas table.
    pub const fn shape(&self) -> CallShape {
        match self {
            Self::Transfer { .. } => CallShape::NativeTransfer,
            Self::Erc20Transfer { .. } => CallShape::Erc20Transfer,
            Self::Call { .. } => CallShape::ContractCall,
        }
    }

    /// The transaction target.
    pub const fn target(&self) -> Address {
        match self {
            Self::Transfer { to } => *to,
            Self::Erc20Transfer { token, .. } => *token,
            Self::Call { to, .. } => *to,
        }
    }
}

/// One step of the rescue sequence.
///
/// Steps execute in exactly their declared order; later amounts are derived
/// from the cumulative effect of all earlier steps, so there is nothing to
/// reorder or parallelize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    label: &'static str,
    sender: StepSender,
    call: CallKind,
    amount: Amount,
}

impl Step {
    /// Create a step.
    pub const fn new(
        label: &'static str,
        sender: StepSender,
        call: CallKind,
        amount: Amount,
    ) -> Self {
        Self { label, sender, call, amount }
    }

    /// The step's label, used in every report about it.
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Which account signs this step.
    pub const fn sender(&self) -> StepSender {
        self.sender
    }

    /// The call this step makes.
    pub const fn call(&self) -> &CallKind {
        &self.call
    }

    /// How this step's amount is determined.
    pub const fn amount(&self) -> &Amount {
        &self.amount
    }

    /// True if this step consumes an observation of prior steps' effects.
    pub const fn is_dependent(&self) -> bool {
        matches!(self.amount, Amount::Observed(_))
    }

    /// Build the step's intent once its amount is resolved.
    pub fn intent(
        &self,
        chain_id: u64,
        from: Address,
        nonce: u64,
        amount: U256,
        policy: &GasPolicy,
        gas_table: &GasTable,
    ) -> Result<TxIntent, IntentError> {
        let shape = self.call.shape();
        let builder = TxIntent::builder()
            .chain_id(chain_id)
            .from(from)
            .to(self.call.target())
            .nonce(nonce)
            .gas_price(policy.applied_price())
            .gas_limit(gas_table.limit_for(shape))
            .shape(shape);

        match &self.call {
            CallKind::Transfer { .. } => builder.value(amount).build(),
            CallKind::Erc20Transfer { recipient, .. } => {
                let data = IERC20::transferCall { to: *recipient, amount }.abi_encode();
                builder.value(U256::ZERO).input(data).build()
            }
            CallKind::Call { data, .. } => builder.value(amount).input(data.clone()).build(),
        }
    }
}

/// The audited record of one resolved step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// The step label.
    pub label: &'static str,
    /// The signing account.
    pub sender: Address,
    /// The target of the call.
    pub target: Address,
    /// The resolved amount.
    pub amount: U256,
    /// The observation behind the amount, for dependent steps.
    pub observed: Option<U256>,
    /// The nonce assigned to the step's transaction.
    pub nonce: u64,
    /// The signed transaction's hash.
    pub tx_hash: B256,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const RESCUER: Address = address!("0x1111111111111111111111111111111111111111");
    const SAFE: Address = address!("0x3333333333333333333333333333333333333333");
    const TOKEN: Address = address!("0x4444444444444444444444444444444444444444");

    fn policy() -> GasPolicy {
        GasPolicy::new(100, 20)
    }

    #[test]
    fn transfer_amount_lands_in_value() {
        let step = Step::new(
            "fund_gas",
            StepSender::Rescuer,
            CallKind::Transfer { to: SAFE },
            Amount::Fixed(U256::from(500)),
        );
        let intent =
            step.intent(1, RESCUER, 0, U256::from(500), &policy(), &GasTable::default()).unwrap();
        assert_eq!(intent.value(), U256::from(500));
        assert!(intent.input().is_empty());
        assert_eq!(intent.gas_limit(), 21_000);
        assert_eq!(intent.gas_price(), 120);
    }

    #[test]
    fn erc20_amount_lands_in_calldata() {
        let step = Step::new(
            "sweep_asset",
            StepSender::Compromised,
            CallKind::Erc20Transfer { token: TOKEN, recipient: SAFE },
            Amount::Observed(Probe::Erc20Balance { token: TOKEN, holder: RESCUER }),
        );
        let intent =
            step.intent(1, RESCUER, 3, U256::from(777), &policy(), &GasTable::default()).unwrap();

        assert_eq!(intent.value(), U256::ZERO);
        assert_eq!(intent.to(), TOKEN);

        let decoded = IERC20::transferCall::abi_decode(intent.input()).unwrap();
        assert_eq!(decoded.to, SAFE);
        assert_eq!(decoded.amount, U256::from(777));
    }

    #[test]
    fn call_keeps_its_fixed_calldata() {
        let data: Bytes = vec![0x4e, 0x71, 0xd9, 0x2d].into();
        let step = Step::new(
            "trigger_claim",
            StepSender::Compromised,
            CallKind::Call { to: TOKEN, data: data.clone() },
            Amount::Fixed(U256::ZERO),
        );
        let intent =
            step.intent(1, RESCUER, 1, U256::ZERO, &policy(), &GasTable::default()).unwrap();
        assert_eq!(intent.input(), &data);
        assert_eq!(intent.gas_limit(), GasTable::default().contract_call);
    }

    #[test]
    fn dependent_steps_are_flagged() {
        let dependent = Step::new(
            "sweep_asset",
            StepSender::Compromised,
            CallKind::Erc20Transfer { token: TOKEN, recipient: SAFE },
            Amount::Observed(Probe::Erc20Balance { token: TOKEN, holder: RESCUER }),
        );
        assert!(dependent.is_dependent());

        let independent = Step::new(
            "fund_gas",
            StepSender::Rescuer,
            CallKind::Transfer { to: SAFE },
            Amount::GasStipend { gas_limit: 21_000 },
        );
        assert!(!independent.is_dependent());
    }
}

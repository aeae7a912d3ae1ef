/// The shape of a call the pipeline knows how to make.
///
/// Call shapes are known in advance for a rescue, so each shape carries a
/// fixed gas limit from the [`GasTable`] rather than an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallShape {
    /// A plain native-asset transfer with empty calldata.
    NativeTransfer,
    /// An ERC-20 `transfer(address,uint256)` call.
    Erc20Transfer,
    /// A contract call with arbitrary calldata.
    ContractCall,
}

/// Fixed gas limit per [`CallShape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GasTable {
    /// Gas limit for native transfers.
    pub native_transfer: u64,
    /// Gas limit for ERC-20 transfers.
    pub erc20_transfer: u64,
    /// Gas limit for arbitrary contract calls.
    pub contract_call: u64,
}

impl Default for GasTable {
    fn default() -> Self {
        Self { native_transfer: 21_000, erc20_transfer: 65_000, contract_call: 200_000 }
    }
}

impl GasTable {
    /// Get the gas limit for a call shape.
    pub const fn limit_for(&self, shape: CallShape) -> u64 {
        match shape {
            CallShape::NativeTransfer => self.native_transfer,
            CallShape::Erc20Transfer => self.erc20_transfer,
            CallShape::ContractCall => self.contract_call,
        }
    }
}

/// Gas pricing policy for a single pipeline run.
///
/// The base price is read from the chain once at plan time and scaled by an
/// integer percentage bump so the applied price outbids base-fee drift while
/// the bundle waits for its target block. Scaling is pure integer math with
/// floor division: a base of 100 with a 20% bump applies exactly 120.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GasPolicy {
    base_gas_price: u128,
    bump_percent: u128,
}

impl GasPolicy {
    /// Create a new policy from a chain-read base price and a bump percentage.
    pub const fn new(base_gas_price: u128, bump_percent: u128) -> Self {
        Self { base_gas_price, bump_percent }
    }

    /// The chain-read base gas price.
    pub const fn base_gas_price(&self) -> u128 {
        self.base_gas_price
    }

    /// The configured bump percentage.
    pub const fn bump_percent(&self) -> u128 {
        self.bump_percent
    }

    /// The gas price applied to every transaction built in this run.
    pub const fn applied_price(&self) -> u128 {
        self.base_gas_price * (100 + self.bump_percent) / 100
    }

    /// Cost of a gas stipend at the applied price.
    ///
    /// This is the flat "gas-to-fill" policy amount: applied price times a
    /// fixed allowance, not a measurement of the downstream transaction's
    /// true cost. A fee spike between resolution and inclusion can leave it
    /// short; the bump percentage is the knob that absorbs drift.
    pub const fn stipend_cost(&self, gas_limit: u64) -> u128 {
        self.applied_price() * gas_limit as u128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_is_exact_integer_scaling() {
        let policy = GasPolicy::new(100, 20);
        assert_eq!(policy.applied_price(), 120);
    }

    #[test]
    fn bump_floors_fractional_results() {
        // 33 * 110 / 100 = 36.3 floors to 36.
        let policy = GasPolicy::new(33, 10);
        assert_eq!(policy.applied_price(), 36);
    }

    #[test]
    fn zero_bump_is_identity() {
        let policy = GasPolicy::new(1_000, 0);
        assert_eq!(policy.applied_price(), 1_000);
    }

    #[test]
    fn stipend_cost_scales_by_limit() {
        let policy = GasPolicy::new(100, 20);
        assert_eq!(policy.stipend_cost(21_000), 120 * 21_000);
    }

    #[test]
    fn table_lookup_matches_shape() {
        let table = GasTable::default();
        assert_eq!(table.limit_for(CallShape::NativeTransfer), 21_000);
        assert_eq!(table.limit_for(CallShape::Erc20Transfer), 65_000);
        assert_eq!(table.limit_for(CallShape::ContractCall), 200_000);
    }
}

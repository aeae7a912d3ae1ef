mod error;
pub use error::ConfigError;

pub mod env_utils;

use crate::GasTable;
use alloy::primitives::{Address, Bytes};
use env_utils::{
    load_address, load_bytes, load_list_opt, load_string, load_u128, load_u64, load_u64_opt,
};

/// Default endpoint patterns that require an authenticated submission header.
const DEFAULT_AUTH_PATTERNS: &[&str] = &["flashbots"];

/// Complete configuration for one rescue pipeline.
///
/// Every required field is loaded and validated eagerly, before any chain
/// interaction, and each failure is reported with a distinct error. The
/// struct is passed into the pipeline constructor explicitly; nothing in the
/// pipeline reads the environment.
///
/// Key material is NOT part of the configuration. Signing capabilities are
/// handed to the pipeline separately, so this struct can be logged freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescueConfig {
    /// Live node RPC endpoint.
    pub rpc_url: String,
    /// Disposable forked-state node endpoint used for dry runs.
    pub fork_rpc_url: String,
    /// Primary relay endpoint for bundle submission.
    pub relay_url: String,
    /// Additional best-effort relay endpoints.
    pub extra_relay_urls: Vec<String>,
    /// Endpoint substrings that select authenticated submission.
    pub auth_relay_patterns: Vec<String>,
    /// Chain id transactions are bound to.
    pub chain_id: u64,
    /// The compromised account assets are rescued from.
    pub compromised: Address,
    /// The uncompromised account funding the rescue.
    pub rescuer: Address,
    /// Where rescued assets land.
    pub safe_recipient: Address,
    /// The ERC-20 asset being rescued.
    pub asset_token: Address,
    /// The contract whose distribution/claim must be triggered first.
    pub distributor: Address,
    /// Calldata for the trigger call on the distributor.
    pub claim_calldata: Bytes,
    /// Integer percentage added to the chain-read gas price.
    pub gas_bump_percent: u128,
    /// Flat gas allowance used to size the gas-fill transfer.
    pub gas_fill_limit: u64,
    /// Fixed gas limits per call shape.
    pub gas_table: GasTable,
    /// Permitted deviation between dry-run and commit observations, in
    /// basis points. Zero means any deviation aborts.
    pub mismatch_tolerance_bps: u64,
    /// Upper bound on the bundle inclusion window, in seconds from
    /// assembly. `None` leaves the window unbounded above.
    pub max_window_secs: Option<u64>,
}

impl RescueConfig {
    /// Load the configuration from `SALVAGE_*` environment variables and
    /// validate it.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gas_table = GasTable {
            native_transfer: load_u64_opt("SALVAGE_GAS_LIMIT_NATIVE")
                .unwrap_or(GasTable::default().native_transfer),
            erc20_transfer: load_u64_opt("SALVAGE_GAS_LIMIT_ERC20")
                .unwrap_or(GasTable::default().erc20_transfer),
            contract_call: load_u64_opt("SALVAGE_GAS_LIMIT_CALL")
                .unwrap_or(GasTable::default().contract_call),
        };

        let mut auth_relay_patterns = load_list_opt("SALVAGE_AUTH_RELAY_PATTERNS");
        if auth_relay_patterns.is_empty() {
            auth_relay_patterns = DEFAULT_AUTH_PATTERNS.iter().map(|s| s.to_string()).collect();
        }

        let config = Self {
            rpc_url: load_string("SALVAGE_RPC_URL")?,
            fork_rpc_url: load_string("SALVAGE_FORK_RPC_URL")?,
            relay_url: load_string("SALVAGE_RELAY_URL")?,
            extra_relay_urls: load_list_opt("SALVAGE_EXTRA_RELAY_URLS"),
            auth_relay_patterns,
            chain_id: load_u64("SALVAGE_CHAIN_ID")?,
            compromised: load_address("SALVAGE_COMPROMISED_ADDRESS")?,
            rescuer: load_address("SALVAGE_RESCUER_ADDRESS")?,
            safe_recipient: load_address("SALVAGE_SAFE_ADDRESS")?,
            asset_token: load_address("SALVAGE_ASSET_ADDRESS")?,
            distributor: load_address("SALVAGE_DISTRIBUTOR_ADDRESS")?,
            claim_calldata: load_bytes("SALVAGE_CLAIM_CALLDATA")?,
            gas_bump_percent: load_u128("SALVAGE_GAS_BUMP_PERCENT")?,
            gas_fill_limit: load_u64("SALVAGE_GAS_FILL_LIMIT")?,
            gas_table,
            mismatch_tolerance_bps: load_u64_opt("SALVAGE_MISMATCH_TOLERANCE_BPS").unwrap_or(0),
            max_window_secs: load_u64_opt("SALVAGE_MAX_WINDOW_SECS"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("rpc_url", &self.rpc_url),
            ("fork_rpc_url", &self.fork_rpc_url),
            ("relay_url", &self.relay_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| ConfigError::Url { field, reason: e.to_string() })?;
        }
        for extra in &self.extra_relay_urls {
            url::Url::parse(extra)
                .map_err(|e| ConfigError::Url { field: "extra_relay_urls", reason: e.to_string() })?;
        }

        if self.gas_bump_percent == 0 {
            return Err(ConfigError::invalid(
                "gas_bump_percent",
                "must be positive to outbid base fee drift",
            ));
        }
        if self.gas_fill_limit == 0 {
            return Err(ConfigError::invalid("gas_fill_limit", "must be positive"));
        }
        if self.claim_calldata.len() < 4 {
            return Err(ConfigError::invalid(
                "claim_calldata",
                "must carry at least a function selector",
            ));
        }
        if self.mismatch_tolerance_bps > 10_000 {
            return Err(ConfigError::invalid(
                "mismatch_tolerance_bps",
                "cannot exceed 10000 (100%)",
            ));
        }
        if self.safe_recipient == self.compromised {
            return Err(ConfigError::invalid(
                "safe_recipient",
                "must differ from the compromised account",
            ));
        }
        if self.rescuer == self.compromised {
            return Err(ConfigError::invalid(
                "rescuer",
                "must differ from the compromised account",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn valid_config() -> RescueConfig {
        RescueConfig {
            rpc_url: "http://localhost:8545".into(),
            fork_rpc_url: "http://localhost:8546".into(),
            relay_url: "https://relay.flashbots.net".into(),
            extra_relay_urls: vec![],
            auth_relay_patterns: vec!["flashbots".into()],
            chain_id: 1,
            compromised: address!("0x1111111111111111111111111111111111111111"),
            rescuer: address!("0x2222222222222222222222222222222222222222"),
            safe_recipient: address!("0x3333333333333333333333333333333333333333"),
            asset_token: address!("0x4444444444444444444444444444444444444444"),
            distributor: address!("0x5555555555555555555555555555555555555555"),
            claim_calldata: vec![0x4e, 0x71, 0xd9, 0x2d].into(),
            gas_bump_percent: 20,
            gas_fill_limit: 300_000,
            gas_table: GasTable::default(),
            mismatch_tolerance_bps: 0,
            max_window_secs: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        valid_config().validate().unwrap();
    }

    #[test]
    fn zero_bump_is_rejected() {
        let mut config = valid_config();
        config.gas_bump_percent = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "gas_bump_percent", .. }));
    }

    #[test]
    fn rescuing_to_the_compromised_account_is_rejected() {
        let mut config = valid_config();
        config.safe_recipient = config.compromised;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "safe_recipient", .. }));
    }

    #[test]
    fn bad_relay_url_is_rejected_with_the_field_name() {
        let mut config = valid_config();
        config.relay_url = "not a url".into();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Url { field: "relay_url", .. }));
    }

    #[test]
    fn selectorless_claim_calldata_is_rejected() {
        let mut config = valid_config();
        config.claim_calldata = vec![0x01].into();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "claim_calldata", .. }));
    }
}

use crate::ScriptedBackend;
use alloy::{
    primitives::{address, Address, B256, U256},
    signers::local::PrivateKeySigner,
};
use salvage_types::{GasTable, RescueConfig};

/// The rescued ERC-20 token in canned scenarios.
pub const TOKEN: Address = address!("0x4444444444444444444444444444444444444444");
/// The distributor contract in canned scenarios.
pub const DISTRIBUTOR: Address = address!("0x5555555555555555555555555555555555555555");
/// The safe recipient in canned scenarios.
pub const SAFE: Address = address!("0x3333333333333333333333333333333333333333");

/// Make a wallet with a deterministic keypair.
pub fn make_wallet(i: u8) -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(i)).unwrap()
}

/// A fully-wired canned rescue: config, signers, and a backend whose state
/// matches the config.
#[derive(Debug)]
pub struct RescueScenario {
    /// The validated configuration.
    pub config: RescueConfig,
    /// The rescuer's wallet.
    pub rescuer: PrivateKeySigner,
    /// The compromised account's wallet.
    pub compromised: PrivateKeySigner,
    /// The live-chain backend; `fork()` it for dry-run and commit passes.
    pub backend: ScriptedBackend,
}

impl RescueScenario {
    /// The standard scenario: gas price 100 with a 20% bump, an armed claim
    /// trigger worth `claimable`, a funded rescuer, and an unfunded
    /// compromised account.
    pub fn new(claimable: U256) -> Self {
        let rescuer = make_wallet(1);
        let compromised = make_wallet(2);

        let config = RescueConfig {
            rpc_url: "http://localhost:8545".into(),
            fork_rpc_url: "http://localhost:8546".into(),
            relay_url: "https://relay.flashbots.net".into(),
            extra_relay_urls: vec![],
            auth_relay_patterns: vec!["flashbots".into()],
            chain_id: 1,
            compromised: compromised.address(),
            rescuer: rescuer.address(),
            safe_recipient: SAFE,
            asset_token: TOKEN,
            distributor: DISTRIBUTOR,
            // claim()
            claim_calldata: vec![0x4e, 0x71, 0xd9, 0x2d].into(),
            gas_bump_percent: 20,
            gas_fill_limit: 300_000,
            gas_table: GasTable::default(),
            mismatch_tolerance_bps: 0,
            max_window_secs: None,
        };

        let backend = ScriptedBackend::new()
            .with_gas_price(100)
            .with_block_number(19_000_000)
            .with_nonce(config.rescuer, 2)
            .with_nonce(config.compromised, 5)
            .with_native(config.rescuer, U256::from(10u128.pow(18)))
            .with_claim_trigger(DISTRIBUTOR, TOKEN, compromised.address(), claimable);

        Self { config, rescuer, compromised, backend }
    }
}

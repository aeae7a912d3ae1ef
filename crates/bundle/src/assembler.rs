use crate::RescueBundle;
use salvage_types::SignedTx;

/// Fixes an ordered transaction list into a [`RescueBundle`] targeting one
/// future block.
///
/// The target block is always `head + 1` where `head` is read at assembly
/// time, not at pipeline start — dependency resolution takes long enough for
/// the chain to move. A bundle is built for exactly one target block; if the
/// block passes without inclusion the whole pipeline rebuilds rather than
/// retargeting the stale bundle.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundleAssembler {
    min_timestamp: u64,
    window_secs: Option<u64>,
}

impl BundleAssembler {
    /// New assembler with the default policy: no lower bound
    /// (`minTimestamp = 0`) and no upper bound.
    pub const fn new() -> Self {
        Self { min_timestamp: 0, window_secs: None }
    }

    /// Override the lower inclusion bound.
    pub const fn with_min_timestamp(mut self, min_timestamp: u64) -> Self {
        self.min_timestamp = min_timestamp;
        self
    }

    /// Bound the inclusion window to `window_secs` after assembly.
    pub const fn with_window_secs(mut self, window_secs: u64) -> Self {
        self.window_secs = Some(window_secs);
        self
    }

    /// Assemble signed transactions, in exactly the given order, into a
    /// bundle targeting `head + 1`.
    ///
    /// `now` is the wall-clock timestamp used to anchor the upper window
    /// bound, when one is configured.
    pub fn assemble(&self, head: u64, now: u64, txs: Vec<SignedTx>) -> RescueBundle {
        let mut bundle = RescueBundle::from_raw_txs(txs.into_iter().map(SignedTx::into_raw))
            .with_block_number(head + 1)
            .with_min_timestamp(self.min_timestamp);
        if let Some(window) = self.window_secs {
            bundle = bundle.with_max_timestamp(now + window);
        }
        bundle
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloy::primitives::{Address, B256};

    fn signed(nonce: u64, raw: &[u8]) -> SignedTx {
        SignedTx::new(Address::repeat_byte(1), nonce, B256::repeat_byte(nonce as u8), raw.to_vec().into())
    }

    #[test]
    fn targets_head_plus_one_at_assembly_time() {
        let bundle = BundleAssembler::new().assemble(19_000_000, 1_700_000_000, vec![signed(0, b"a")]);
        assert_eq!(bundle.block_number(), 19_000_001);
        assert_eq!(bundle.min_timestamp(), Some(0));
        assert_eq!(bundle.max_timestamp(), None);
    }

    #[test]
    fn preserves_declared_order() {
        let txs = vec![signed(0, b"first"), signed(1, b"second"), signed(2, b"third")];
        let bundle = BundleAssembler::new().assemble(5, 0, txs);
        let raw: Vec<&[u8]> = bundle.txs().iter().map(|b| b.as_ref()).collect();
        assert_eq!(raw, vec![b"first".as_slice(), b"second", b"third"]);
    }

    #[test]
    fn window_policy_bounds_the_bundle() {
        let bundle = BundleAssembler::new()
            .with_min_timestamp(1_700_000_000)
            .with_window_secs(120)
            .assemble(10, 1_700_000_000, vec![signed(0, b"a")]);
        assert_eq!(bundle.min_timestamp(), Some(1_700_000_000));
        assert_eq!(bundle.max_timestamp(), Some(1_700_000_120));
    }

    #[test]
    fn fresh_heads_retarget_fresh_bundles() {
        // Rebuilding against a moved head must re-derive the target block.
        let assembler = BundleAssembler::new();
        let first = assembler.assemble(100, 0, vec![signed(0, b"a")]);
        let rebuilt = assembler.assemble(104, 0, vec![signed(0, b"a")]);
        assert_eq!(first.block_number(), 101);
        assert_eq!(rebuilt.block_number(), 105);
    }
}

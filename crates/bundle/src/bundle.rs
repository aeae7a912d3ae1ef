//! Rescue bundle types.
use alloy::{
    primitives::{keccak256, Bytes, B256},
    rpc::types::mev::EthSendBundle,
};
use serde::{Deserialize, Serialize};

/// An ordered set of transactions for atomic same-block inclusion.
///
/// Wraps a standard Flashbots [`EthSendBundle`]. The transaction array order
/// is the on-chain execution order — it is fixed at assembly time and must
/// never be reordered downstream. See [the Flashbots docs].
///
/// [the Flashbots docs]: https://docs.flashbots.net/flashbots-auction/advanced/rpc-endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescueBundle {
    /// The inner bundle. Same structure as a Flashbots [`EthSendBundle`].
    #[serde(flatten)]
    pub bundle: EthSendBundle,
}

impl RescueBundle {
    /// Returns the transactions in this bundle.
    pub fn txs(&self) -> &[Bytes] {
        &self.bundle.txs
    }

    /// Returns the target block number for this bundle.
    pub const fn block_number(&self) -> u64 {
        self.bundle.block_number
    }

    /// Returns the minimum timestamp for this bundle.
    pub const fn min_timestamp(&self) -> Option<u64> {
        self.bundle.min_timestamp
    }

    /// Returns the maximum timestamp for this bundle.
    pub const fn max_timestamp(&self) -> Option<u64> {
        self.bundle.max_timestamp
    }

    /// Creates a new bundle from raw transactions, preserving order.
    pub fn from_raw_txs<I, T>(txs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        Self {
            bundle: EthSendBundle {
                txs: txs.into_iter().map(Into::into).collect(),
                ..Default::default()
            },
        }
    }

    /// Adds a raw transaction to the end of the bundle.
    pub fn append_raw_tx(mut self, tx: impl Into<Bytes>) -> Self {
        self.bundle.txs.push(tx.into());
        self
    }

    /// Sets the target block number for the bundle.
    pub const fn with_block_number(mut self, block_number: u64) -> Self {
        self.bundle.block_number = block_number;
        self
    }

    /// Sets the minimum timestamp for the bundle.
    pub const fn with_min_timestamp(mut self, min_timestamp: u64) -> Self {
        self.bundle.min_timestamp = Some(min_timestamp);
        self
    }

    /// Sets the maximum timestamp for the bundle.
    pub const fn with_max_timestamp(mut self, max_timestamp: u64) -> Self {
        self.bundle.max_timestamp = Some(max_timestamp);
        self
    }

    /// The bundle hash: `keccak256(keccak(tx_1) || keccak(tx_2) || ...)`.
    ///
    /// Matches the hash relays echo back in their acknowledgement.
    pub fn bundle_hash(&self) -> B256 {
        let mut hasher = alloy::primitives::Keccak256::new();
        for tx in self.bundle.txs.iter() {
            hasher.update(keccak256(tx).as_slice());
        }
        hasher.finalize()
    }
}

/// Response for `eth_sendBundle`: acceptance for consideration, NOT a
/// guarantee of inclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescueBundleResponse {
    /// The bundle hash of the accepted bundle.
    pub bundle_hash: B256,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn send_bundle_ser_roundtrip() {
        let bundle = RescueBundle {
            bundle: EthSendBundle {
                txs: vec![b"tx1".into(), b"tx2".into()],
                block_number: 1,
                min_timestamp: Some(0),
                max_timestamp: Some(3),
                ..Default::default()
            },
        };

        let serialized = serde_json::to_string(&bundle).unwrap();
        let deserialized: RescueBundle = serde_json::from_str(&serialized).unwrap();

        assert_eq!(bundle, deserialized);
    }

    #[test]
    fn bundle_hash_tracks_contents_and_order() {
        let a = RescueBundle::from_raw_txs([b"tx1".to_vec(), b"tx2".to_vec()]);
        let b = RescueBundle::from_raw_txs([b"tx2".to_vec(), b"tx1".to_vec()]);
        assert_ne!(a.bundle_hash(), b.bundle_hash());

        let a2 = RescueBundle::from_raw_txs([b"tx1".to_vec(), b"tx2".to_vec()]);
        assert_eq!(a.bundle_hash(), a2.bundle_hash());
    }

    #[test]
    fn response_ser_roundtrip() {
        let resp = RescueBundleResponse { bundle_hash: B256::repeat_byte(1) };
        let serialized = serde_json::to_string(&resp).unwrap();
        let deserialized: RescueBundleResponse = serde_json::from_str(&serialized).unwrap();
        assert_eq!(resp, deserialized);
    }
}

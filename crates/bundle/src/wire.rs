use crate::RescueBundle;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// The JSON-RPC method relays accept bundles on.
pub const ETH_SEND_BUNDLE: &str = "eth_sendBundle";

/// Errors raised while encoding or decoding the wire envelope.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// JSON (de)serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The envelope carried an unexpected method.
    #[error("unexpected method: {0}")]
    WrongMethod(String),
    /// The params array did not hold exactly one bundle.
    #[error("expected exactly one bundle in params, got {0}")]
    BadParams(usize),
}

/// The `eth_sendBundle` JSON-RPC request envelope.
///
/// The params array holds exactly one bundle; the bundle's transaction array
/// order is the execution-order contract with the relay, and serialization
/// preserves it exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleRequest {
    /// JSON-RPC version, always `"2.0"`.
    pub jsonrpc: Cow<'static, str>,
    /// Request id.
    pub id: u64,
    /// The method, always [`ETH_SEND_BUNDLE`].
    pub method: Cow<'static, str>,
    /// Single-element params array containing the bundle.
    pub params: Vec<RescueBundle>,
}

impl BundleRequest {
    /// Wrap a bundle in the request envelope.
    pub fn new(bundle: RescueBundle) -> Self {
        Self {
            jsonrpc: Cow::Borrowed("2.0"),
            id: 1,
            method: Cow::Borrowed(ETH_SEND_BUNDLE),
            params: vec![bundle],
        }
    }

    /// Serialize to the exact payload bytes submitted to the relay.
    ///
    /// These bytes are what any authentication signature must cover; callers
    /// must transmit them verbatim, without re-serializing.
    pub fn to_payload(&self) -> Result<Vec<u8>, WireError> {
        serde_json::to_vec(self).map_err(Into::into)
    }

    /// Parse a payload back into the envelope, validating its shape.
    pub fn from_payload(payload: &[u8]) -> Result<Self, WireError> {
        let request: Self = serde_json::from_slice(payload)?;
        if request.method != ETH_SEND_BUNDLE {
            return Err(WireError::WrongMethod(request.method.into_owned()));
        }
        if request.params.len() != 1 {
            return Err(WireError::BadParams(request.params.len()));
        }
        Ok(request)
    }

    /// The bundle carried by this request.
    pub fn bundle(&self) -> &RescueBundle {
        &self.params[0]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn request(txs: Vec<Vec<u8>>, block: u64) -> BundleRequest {
        BundleRequest::new(
            RescueBundle::from_raw_txs(txs).with_block_number(block).with_min_timestamp(0),
        )
    }

    #[test]
    fn payload_roundtrip_preserves_order_and_block() {
        let req = request(vec![b"aa".to_vec(), b"bb".to_vec(), b"cc".to_vec()], 19_000_001);
        let payload = req.to_payload().unwrap();
        let parsed = BundleRequest::from_payload(&payload).unwrap();

        assert_eq!(parsed.bundle().txs(), req.bundle().txs());
        assert_eq!(parsed.bundle().block_number(), 19_000_001);
        assert_eq!(parsed, req);
    }

    #[test]
    fn envelope_carries_the_rpc_frame() {
        let req = request(vec![b"aa".to_vec()], 100);
        let value: serde_json::Value = serde_json::from_slice(&req.to_payload().unwrap()).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "eth_sendBundle");
        assert_eq!(value["params"][0]["blockNumber"], "0x64");
        assert_eq!(value["params"][0]["minTimestamp"], 0);
        assert!(value["params"][0]["txs"].is_array());
    }

    #[test]
    fn wrong_method_is_rejected() {
        let mut req = request(vec![b"aa".to_vec()], 100);
        req.method = Cow::Borrowed("eth_sendRawTransaction");
        let payload = req.to_payload().unwrap();
        assert!(matches!(
            BundleRequest::from_payload(&payload),
            Err(WireError::WrongMethod(_))
        ));
    }

    #[test]
    fn multiple_params_are_rejected() {
        let mut req = request(vec![b"aa".to_vec()], 100);
        req.params.push(RescueBundle::from_raw_txs([b"bb".to_vec()]));
        let payload = req.to_payload().unwrap();
        assert!(matches!(BundleRequest::from_payload(&payload), Err(WireError::BadParams(2))));
    }

    proptest! {
        /// Order-preservation law: any tx list survives the wire roundtrip
        /// in exactly its declared order.
        #[test]
        fn roundtrip_preserves_arbitrary_tx_order(
            txs in proptest::collection::vec(
                proptest::collection::vec(any::<u8>(), 1..64),
                1..12,
            ),
            block in 1u64..u64::MAX,
        ) {
            let req = request(txs.clone(), block);
            let parsed = BundleRequest::from_payload(&req.to_payload().unwrap()).unwrap();

            let roundtripped: Vec<Vec<u8>> =
                parsed.bundle().txs().iter().map(|b| b.to_vec()).collect();
            prop_assert_eq!(roundtripped, txs);
            prop_assert_eq!(parsed.bundle().block_number(), block);
        }
    }
}

use alloy::{
    primitives::keccak256,
    signers::{Signer, SignerSync},
};

/// Header carrying the relay authentication signature.
pub const FLASHBOTS_SIGNATURE_HEADER: &str = "X-Flashbots-Signature";

/// Authentication capability for one relay endpoint.
///
/// Selected by matching the endpoint against the configured authenticated
/// patterns: a matching endpoint gets a detached signature header over the
/// exact payload bytes, any other endpoint gets no header at all.
#[derive(Debug, Clone)]
pub enum RelayAuth<S> {
    /// The endpoint requires the signature header; sign with this identity.
    Signed(S),
    /// The endpoint takes unauthenticated submissions.
    Open,
}

impl<S> RelayAuth<S>
where
    S: Signer + SignerSync,
{
    /// Select the auth variant for an endpoint.
    pub fn for_endpoint(endpoint: &str, patterns: &[String], signer: S) -> Self {
        if patterns.iter().any(|pattern| endpoint.contains(pattern.as_str())) {
            Self::Signed(signer)
        } else {
            Self::Open
        }
    }

    /// Compute the header value for a payload, if this endpoint needs one.
    ///
    /// The scheme is hash-of-hash: keccak the payload, then sign the EIP-191
    /// message wrapping the hex-encoded hash. The signature binds to the
    /// exact byte sequence — it must be computed on the final payload form,
    /// immediately before transmission, and any re-serialization afterwards
    /// invalidates it.
    pub fn header_for(&self, payload: &[u8]) -> Result<Option<String>, alloy::signers::Error> {
        let Self::Signed(signer) = self else {
            return Ok(None);
        };
        let hash = keccak256(payload);
        let message = format!("0x{}", hex::encode(hash));
        let signature = signer.sign_message_sync(message.as_bytes())?;
        Ok(Some(format!("{:#x}:0x{}", signer.address(), hex::encode(signature.as_bytes()))))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloy::{
        primitives::{Address, Signature, B256},
        signers::local::PrivateKeySigner,
    };
    use std::str::FromStr;

    fn wallet() -> PrivateKeySigner {
        PrivateKeySigner::from_bytes(&B256::repeat_byte(7)).unwrap()
    }

    fn patterns() -> Vec<String> {
        vec!["flashbots".to_string()]
    }

    #[test]
    fn matching_endpoint_selects_signed() {
        let auth =
            RelayAuth::for_endpoint("https://relay.flashbots.net", &patterns(), wallet());
        assert!(matches!(auth, RelayAuth::Signed(_)));
    }

    #[test]
    fn other_endpoints_stay_open() {
        let auth = RelayAuth::for_endpoint("https://rpc.beaverbuild.org", &patterns(), wallet());
        assert!(matches!(auth, RelayAuth::Open));
        assert_eq!(auth.header_for(b"payload").unwrap(), None);
    }

    #[test]
    fn header_names_the_signer() {
        let signer = wallet();
        let address = signer.address();
        let auth = RelayAuth::Signed(signer);

        let header = auth.header_for(b"{\"id\":1}").unwrap().unwrap();
        let (addr_part, sig_part) = header.split_once(':').unwrap();
        assert_eq!(Address::from_str(addr_part).unwrap(), address);
        assert!(sig_part.starts_with("0x"));
    }

    #[test]
    fn signature_binds_to_exact_payload_bytes() {
        let signer = wallet();
        let address = signer.address();
        let auth = RelayAuth::Signed(signer);

        let payload = br#"{"jsonrpc":"2.0","id":1,"method":"eth_sendBundle","params":[]}"#;
        let header = auth.header_for(payload).unwrap().unwrap();
        let (_, sig_part) = header.split_once(':').unwrap();
        let signature = Signature::from_str(sig_part).unwrap();

        // The stored signature verifies against the original bytes.
        let message = format!("0x{}", hex::encode(keccak256(payload)));
        assert_eq!(signature.recover_address_from_msg(message.as_bytes()).unwrap(), address);

        // Perturbing one byte of the payload changes the recomputed hash, so
        // the stored signature no longer resolves to the signer.
        let mut perturbed = payload.to_vec();
        perturbed[30] ^= 0x01;
        let message = format!("0x{}", hex::encode(keccak256(&perturbed)));
        assert_ne!(signature.recover_address_from_msg(message.as_bytes()).unwrap(), address);
    }
}

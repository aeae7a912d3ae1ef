use crate::{
    error::Result, RelayAuth, RelayError, FLASHBOTS_SIGNATURE_HEADER,
};
use alloy::signers::{Signer, SignerSync};
use salvage_bundle::{BundleRequest, RescueBundleResponse};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// JSON-RPC acknowledgement envelope returned by relays.
#[derive(Debug, Deserialize)]
struct AckEnvelope {
    #[serde(default)]
    result: Option<RescueBundleResponse>,
    #[serde(default)]
    error: Option<AckError>,
}

#[derive(Debug, Deserialize)]
struct AckError {
    code: i64,
    message: String,
}

/// Submits bundles to one relay endpoint.
///
/// A successful return means the relay accepted the bundle for
/// consideration — it is NOT inclusion. Submission is never retried here:
/// after any failure the caller must rebuild the whole pipeline from fresh
/// reads rather than resubmit a stale payload.
#[derive(Debug, Clone)]
pub struct RelayClient<S> {
    /// The relay endpoint.
    url: reqwest::Url,
    /// The reqwest client used to send requests.
    client: reqwest::Client,
    /// Per-endpoint authentication capability.
    auth: RelayAuth<S>,
}

impl<S> RelayClient<S>
where
    S: Signer + SignerSync,
{
    /// Create a new client with the given URL, client, and auth capability.
    pub const fn new_with_client(
        url: reqwest::Url,
        client: reqwest::Client,
        auth: RelayAuth<S>,
    ) -> Self {
        Self { url, client, auth }
    }

    /// Create a new client with a fresh reqwest client.
    pub fn new(url: reqwest::Url, auth: RelayAuth<S>) -> Self {
        Self::new_with_client(url, reqwest::Client::new(), auth)
    }

    /// Create a client from a string URL, selecting auth by endpoint match.
    pub fn new_from_string(url: &str, auth_patterns: &[String], signer: S) -> Result<Self> {
        let auth = RelayAuth::for_endpoint(url, auth_patterns, signer);
        let url = reqwest::Url::parse(url)?;
        Ok(Self::new(url, auth))
    }

    /// The endpoint this client submits to.
    pub fn endpoint(&self) -> &str {
        self.url.as_str()
    }

    /// Whether this endpoint gets the authentication header.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.auth, RelayAuth::Signed(_))
    }

    /// Serialize, sign, and submit a bundle request.
    #[instrument(skip_all, fields(endpoint = %self.url))]
    pub async fn submit_bundle(&self, request: &BundleRequest) -> Result<RescueBundleResponse> {
        let payload = request.to_payload()?;
        self.submit_payload(&payload).await
    }

    /// Submit exact payload bytes.
    ///
    /// The authentication signature (when the endpoint requires one) is
    /// computed over precisely these bytes, immediately before transmission.
    pub async fn submit_payload(&self, payload: &[u8]) -> Result<RescueBundleResponse> {
        let mut request = self
            .client
            .post(self.url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload.to_vec());

        if let Some(header) = self.auth.header_for(payload)? {
            request = request.header(FLASHBOTS_SIGNATURE_HEADER, header);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(RelayError::Rejected { status: status.as_u16(), body });
        }

        let ack: AckEnvelope = serde_json::from_str(&body)
            .map_err(|_| RelayError::MalformedAck)?;
        if let Some(error) = ack.error {
            return Err(RelayError::RpcRejected { code: error.code, message: error.message });
        }
        let ack = ack.result.ok_or(RelayError::MalformedAck)?;

        debug!(bundle_hash = %ack.bundle_hash, "relay accepted bundle for consideration");
        Ok(ack)
    }
}

/// A primary relay plus best-effort secondaries.
///
/// The primary's acknowledgement is authoritative; secondary failures are
/// logged and swallowed. Every endpoint receives byte-identical payloads, so
/// each client signs the same bytes its endpoint receives.
#[derive(Debug, Clone)]
pub struct RelayFanout<S> {
    primary: RelayClient<S>,
    secondary: Vec<RelayClient<S>>,
}

impl<S> RelayFanout<S>
where
    S: Signer + SignerSync,
{
    /// Create a fanout around a primary relay.
    pub const fn new(primary: RelayClient<S>) -> Self {
        Self { primary, secondary: Vec::new() }
    }

    /// Attach a best-effort secondary relay.
    pub fn with_secondary(mut self, relay: RelayClient<S>) -> Self {
        self.secondary.push(relay);
        self
    }

    /// The primary relay.
    pub const fn primary(&self) -> &RelayClient<S> {
        &self.primary
    }

    /// The secondary relays.
    pub fn secondary(&self) -> &[RelayClient<S>] {
        &self.secondary
    }

    /// Submit to the primary, then fan out to secondaries best-effort.
    #[instrument(skip_all)]
    pub async fn submit_bundle(&self, request: &BundleRequest) -> Result<RescueBundleResponse> {
        let payload = request.to_payload()?;
        let ack = self.primary.submit_payload(&payload).await?;

        for relay in &self.secondary {
            if let Err(error) = relay.submit_payload(&payload).await {
                warn!(%error, endpoint = %relay.endpoint(), "secondary relay submission failed");
            }
        }

        Ok(ack)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloy::{primitives::B256, signers::local::PrivateKeySigner};

    fn wallet() -> PrivateKeySigner {
        PrivateKeySigner::from_bytes(&B256::repeat_byte(9)).unwrap()
    }

    #[test]
    fn auth_is_selected_by_endpoint_not_globally() {
        let patterns = vec!["flashbots".to_string()];

        let signed =
            RelayClient::new_from_string("https://relay.flashbots.net", &patterns, wallet())
                .unwrap();
        assert!(signed.is_authenticated());

        let open = RelayClient::new_from_string("https://rpc.beaverbuild.org", &patterns, wallet())
            .unwrap();
        assert!(!open.is_authenticated());
    }

    #[test]
    fn bad_url_is_reported() {
        let result = RelayClient::new_from_string("not a url", &[], wallet());
        assert!(matches!(result, Err(RelayError::Url(_))));
    }

    #[test]
    fn ack_envelope_parses_result_and_error() {
        let ok: AckEnvelope = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"result":{"bundleHash":"0x0101010101010101010101010101010101010101010101010101010101010101"}}"#,
        )
        .unwrap();
        assert!(ok.result.is_some());
        assert!(ok.error.is_none());

        let err: AckEnvelope = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32600,"message":"bundle too large"}}"#,
        )
        .unwrap();
        assert_eq!(err.error.unwrap().code, -32600);
    }
}

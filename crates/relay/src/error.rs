use salvage_bundle::WireError;

/// Result type for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors returned by the [`RelayClient`].
///
/// [`RelayClient`]: crate::RelayClient
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// An error occurred while parsing the relay URL.
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// The payload could not be encoded.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// Computing the authentication header failed.
    #[error("failed to sign relay payload: {0}")]
    Auth(#[from] alloy::signers::Error),

    /// The relay answered with a non-success HTTP status.
    #[error("relay rejected bundle: HTTP {status}: {body}")]
    Rejected {
        /// The HTTP status code.
        status: u16,
        /// The response body, for the operator's audit trail.
        body: String,
    },

    /// The relay answered with a JSON-RPC error.
    #[error("relay rejected bundle: code {code}: {message}")]
    RpcRejected {
        /// The JSON-RPC error code.
        code: i64,
        /// The JSON-RPC error message.
        message: String,
    },

    /// The relay acknowledgement had neither a result nor an error.
    #[error("malformed relay acknowledgement")]
    MalformedAck,

    /// An error occurred while contacting the relay.
    #[error("error contacting relay: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Error type for [`crate::config`]. Captures errors related to loading
/// configuration from the environment or validating it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error loading from environment variable
    #[error("missing or non-unicode environment variable: {0}")]
    Var(String),
    /// Error parsing environment variable
    #[error("failed to parse environment variable: {0}")]
    Parse(#[from] std::num::ParseIntError),
    /// Error parsing hex from environment variable
    #[error("failed to parse hex: {0}")]
    Hex(#[from] hex::FromHexError),
    /// Error parsing a URL from environment variable
    #[error("failed to parse URL for {field}: {reason}")]
    Url {
        /// The configuration field that failed.
        field: &'static str,
        /// Why the URL was rejected.
        reason: String,
    },
    /// A field loaded but failed validation.
    #[error("invalid configuration for {field}: {reason}")]
    Invalid {
        /// The configuration field that failed.
        field: &'static str,
        /// Why validation rejected it.
        reason: &'static str,
    },
}

impl ConfigError {
    /// Missing or non-unicode env var.
    pub fn missing(s: &str) -> Self {
        ConfigError::Var(s.to_string())
    }

    /// A field that loaded but failed validation.
    pub const fn invalid(field: &'static str, reason: &'static str) -> Self {
        ConfigError::Invalid { field, reason }
    }
}

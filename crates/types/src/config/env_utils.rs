//! Helpers for loading typed values from the environment.

use crate::ConfigError;
use alloy::primitives::{Address, Bytes};
use std::env;

/// Load a variable from the environment
pub fn load_string(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::missing(key))
}

/// Load a variable from the environment
pub fn load_string_opt(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Load a variable from the environment
pub fn load_u64(key: &str) -> Result<u64, ConfigError> {
    let val = load_string(key)?;
    val.parse::<u64>().map_err(Into::into)
}

/// Load a variable from the environment
pub fn load_u64_opt(key: &str) -> Option<u64> {
    load_string_opt(key)?.parse().ok()
}

/// Load a variable from the environment
pub fn load_u128(key: &str) -> Result<u128, ConfigError> {
    let val = load_string(key)?;
    val.parse::<u128>().map_err(Into::into)
}

/// Load a variable from the environment
pub fn load_address(key: &str) -> Result<Address, ConfigError> {
    load_string(key)?.parse().map_err(Into::into)
}

/// Load hex-encoded bytes from the environment
pub fn load_bytes(key: &str) -> Result<Bytes, ConfigError> {
    let val = load_string(key)?;
    hex::decode(val).map(Into::into).map_err(Into::into)
}

/// Load a comma-separated list from the environment, empty if unset.
pub fn load_list_opt(key: &str) -> Vec<String> {
    load_string_opt(key)
        .map(|raw| {
            raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned).collect()
        })
        .unwrap_or_default()
}

//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CART_STORAGE_KEY` - Storage key of the persisted cart (default: `@RocketShoes:cart`)
//! - `CART_MAILBOX_SIZE` - Pending requests the cart service buffers (default: 32)
//! - `CART_STATE_DIR` - Directory for file-backed storage; in-memory when unset
//! - `CART_CORRUPT_STATE` - `fail` or `reset` when the stored cart is unreadable (default: `fail`)
//! - `INVENTORY_BASE_URL` - Inventory REST API; in-process demo catalog when unset
//! - `INVENTORY_TIMEOUT_MS` - Per-request inventory timeout (default: 5000)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::storage::{CorruptStatePolicy, DEFAULT_CART_KEY};

const DEFAULT_MAILBOX_SIZE: usize = 32;
const DEFAULT_INVENTORY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq)]
pub struct CartConfig {
    pub storage_key: String,
    pub mailbox_size: usize,
    pub state_dir: Option<PathBuf>,
    pub corrupt_state: CorruptStatePolicy,
    pub inventory_url: Option<String>,
    pub inventory_timeout: Duration,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_CART_KEY.to_string(),
            mailbox_size: DEFAULT_MAILBOX_SIZE,
            state_dir: None,
            corrupt_state: CorruptStatePolicy::Fail,
            inventory_url: None,
            inventory_timeout: Duration::from_millis(DEFAULT_INVENTORY_TIMEOUT_MS),
        }
    }
}

impl FromStr for CorruptStatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(CorruptStatePolicy::Fail),
            "reset" => Ok(CorruptStatePolicy::Reset),
            other => Err(format!("expected `fail` or `reset`, got `{other}`")),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mailbox_size = match get("CART_MAILBOX_SIZE") {
            Some(raw) => parse_var::<usize>("CART_MAILBOX_SIZE", &raw)?,
            None => defaults.mailbox_size,
        };
        if mailbox_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CART_MAILBOX_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let corrupt_state = match get("CART_CORRUPT_STATE") {
            Some(raw) => parse_var::<CorruptStatePolicy>("CART_CORRUPT_STATE", &raw)?,
            None => defaults.corrupt_state,
        };

        let inventory_timeout = match get("INVENTORY_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(parse_var::<u64>("INVENTORY_TIMEOUT_MS", &raw)?),
            None => defaults.inventory_timeout,
        };

        Ok(Self {
            storage_key: get("CART_STORAGE_KEY").unwrap_or(defaults.storage_key),
            mailbox_size,
            state_dir: get("CART_STATE_DIR").map(PathBuf::from),
            corrupt_state,
            inventory_url: get("INVENTORY_BASE_URL"),
            inventory_timeout,
        })
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<CartConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CartConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        assert_eq!(config_from(&[]).unwrap(), CartConfig::default());
        assert_eq!(CartConfig::default().storage_key, "@RocketShoes:cart");
    }

    #[test]
    fn test_reads_all_variables() {
        let config = config_from(&[
            ("CART_STORAGE_KEY", "shop:cart"),
            ("CART_MAILBOX_SIZE", "4"),
            ("CART_STATE_DIR", "/var/lib/cart"),
            ("CART_CORRUPT_STATE", "Reset"),
            ("INVENTORY_BASE_URL", "http://localhost:3333"),
            ("INVENTORY_TIMEOUT_MS", "250"),
        ])
        .unwrap();

        assert_eq!(config.storage_key, "shop:cart");
        assert_eq!(config.mailbox_size, 4);
        assert_eq!(config.state_dir, Some(PathBuf::from("/var/lib/cart")));
        assert_eq!(config.corrupt_state, CorruptStatePolicy::Reset);
        assert_eq!(config.inventory_url.as_deref(), Some("http://localhost:3333"));
        assert_eq!(config.inventory_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("CART_STORAGE_KEY", "  "), ("INVENTORY_BASE_URL", "")]).unwrap();
        assert_eq!(config.storage_key, DEFAULT_CART_KEY);
        assert_eq!(config.inventory_url, None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = config_from(&[("CART_MAILBOX_SIZE", "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CART_MAILBOX_SIZE"));

        let err = config_from(&[("CART_MAILBOX_SIZE", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CART_MAILBOX_SIZE"));

        let err = config_from(&[("CART_CORRUPT_STATE", "ignore")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid environment variable CART_CORRUPT_STATE: expected `fail` or `reset`, got `ignore`"
        );
    }
}

//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SO_STORAGE_PATH` - Path of the on-disk store file (default: so-storage.json)
//! - `SO_CART_KEY` - Storage key holding the cart (default: so-cart)
//! - `SO_PLACEHOLDER_IMAGE` - Image shown for products without one
//!   (default: /images/placeholder.svg)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use thiserror::Error;

use crate::cart::CART_KEY;

/// Default location of the on-disk store.
pub const DEFAULT_STORAGE_PATH: &str = "so-storage.json";

/// Default image for products with no image of their own.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = crate::cart::DEFAULT_PLACEHOLDER_IMAGE;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Path of the JSON file backing the key-value store
    pub storage_path: PathBuf,
    /// Cart storage and display settings
    pub cart: CartConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Cart storage and display settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Storage key holding the serialized cart
    pub key: String,
    /// Image shown when a line item has none
    pub placeholder_image: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            key: CART_KEY.to_string(),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

impl StorefrontConfig {
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

    /// Build configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let storage_path = PathBuf::from(non_empty(
            "SO_STORAGE_PATH",
            get_or_default("SO_STORAGE_PATH", DEFAULT_STORAGE_PATH),
        )?);
        let cart = CartConfig {
            key: non_empty("SO_CART_KEY", get_or_default("SO_CART_KEY", CART_KEY))?,
            placeholder_image: non_empty(
                "SO_PLACEHOLDER_IMAGE",
                get_or_default("SO_PLACEHOLDER_IMAGE", DEFAULT_PLACEHOLDER_IMAGE),
            )?,
        };
        let sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.trim().is_empty());

        Ok(Self {
            storage_path,
            cart,
            sentry_dsn,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Reject blank values.
fn non_empty(key: &str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be empty".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.storage_path, PathBuf::from("so-storage.json"));
        assert_eq!(config.cart, CartConfig::default());
        assert_eq!(config.cart.key, "so-cart");
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("SO_STORAGE_PATH", "/tmp/store.json"),
            ("SO_CART_KEY", "test-cart"),
            ("SO_PLACEHOLDER_IMAGE", "/img/none.png"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ]))
        .unwrap();

        assert_eq!(config.storage_path, PathBuf::from("/tmp/store.json"));
        assert_eq!(config.cart.key, "test-cart");
        assert_eq!(config.cart.placeholder_image, "/img/none.png");
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_blank_cart_key_rejected() {
        let result = StorefrontConfig::from_lookup(lookup(&[("SO_CART_KEY", "  ")]));
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SO_CART_KEY"));
    }

    #[test]
    fn test_blank_sentry_dsn_is_none() {
        let config = StorefrontConfig::from_lookup(lookup(&[("SENTRY_DSN", "")])).unwrap();
        assert!(config.sentry_dsn.is_none());
    }
}

//! Package configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `OIDC_BRIDGE`
//! prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use oidc_bridge::config::ProvisioningConfig;
//!
//! let config = ProvisioningConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;

pub use error::{ConfigError, ConfigValidationError};

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::identity::LogicalKey;

/// Provisioning configuration for the reconciliation core.
///
/// All options default to the safe side: no claim remapping, auto-creation
/// off, no roles granted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvisioningConfig {
    /// Logical-key to provider-claim-name overrides.
    #[serde(default)]
    pub identity_value_mapping: HashMap<String, String>,

    /// Whether a previously-unseen external identity may be provisioned.
    #[serde(default)]
    pub auto_create_user: bool,

    /// Role names granted to an auto-created user.
    #[serde(default)]
    pub roles_for_auto_created_user: Vec<String>,
}

impl ProvisioningConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `OIDC_BRIDGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into the typed configuration struct
    ///
    /// # Environment Variable Format
    ///
    /// - `OIDC_BRIDGE__AUTO_CREATE_USER=true` -> `auto_create_user = true`
    /// - `OIDC_BRIDGE__IDENTITY_VALUE_MAPPING__USERNAME=upn`
    ///   -> `identity_value_mapping["username"] = "upn"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("OIDC_BRIDGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Rejects mapping entries that name a key outside the fixed logical
    /// set, empty claim-name targets, and empty role names, so typos
    /// surface at load time instead of as permanently missing claims.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (key, claim) in &self.identity_value_mapping {
            if LogicalKey::parse(key).is_none() {
                return Err(ConfigValidationError::UnknownLogicalKey(key.clone()));
            }
            if claim.is_empty() {
                return Err(ConfigValidationError::EmptyClaimName(key.clone()));
            }
        }
        if self
            .roles_for_auto_created_user
            .iter()
            .any(|name| name.is_empty())
        {
            return Err(ConfigValidationError::EmptyRoleName);
        }
        Ok(())
    }
}

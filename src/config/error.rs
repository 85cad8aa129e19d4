//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ConfigValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, Error)]
pub enum ConfigValidationError {
    #[error("Unknown logical identity key '{0}' in identity_value_mapping")]
    UnknownLogicalKey(String),

    #[error("roles_for_auto_created_user contains an empty role name")]
    EmptyRoleName,

    #[error("identity_value_mapping maps '{0}' to an empty claim name")]
    EmptyClaimName(String),
}

//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A required identity claim was absent from the verified claim set.
///
/// `requested` is the provider claim name that was looked up, after any
/// configured remapping. `available` lists every claim name actually
/// present, so a misconfigured mapping is visible from the error alone.
#[derive(Debug, Clone, Error)]
#[error("Identity claims do not contain '{requested}', available are: {}", .available.join(", "))]
pub struct MissingClaim {
    pub requested: String,
    pub available: Vec<String>,
}

impl MissingClaim {
    /// Creates a missing claim error for the given claim name.
    pub fn new(requested: impl Into<String>, available: Vec<String>) -> Self {
        Self {
            requested: requested.into(),
            available,
        }
    }
}

/// Failures from the host's persistence layer.
///
/// These are fatal for the current authentication attempt; there is no
/// retry or backoff at this level.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The natural key `(identifier, provider)` already exists in storage.
    #[error("Account '{identifier}' already exists for provider '{provider}'")]
    Conflict {
        identifier: String,
        provider: String,
    },

    /// The storage layer is unreachable (network, pool exhaustion, etc.).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Any other storage failure.
    #[error("Storage failure: {0}")]
    Internal(String),
}

impl StorageError {
    /// Creates an unavailability error with a message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates an internal storage error with a message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error is a natural-key collision.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict { .. })
    }
}

/// Top-level failure of a reconciliation attempt.
#[derive(Debug, Clone, Error)]
pub enum ReconcileError {
    /// A claim that the flow cannot proceed without was absent.
    #[error(transparent)]
    MissingClaim(#[from] MissingClaim),

    /// The persistence layer failed; the attempt is abandoned.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The exchange lookup found no active account for the principal's
    /// natural key even though one was expected to exist.
    #[error("No active account '{identifier}' for provider '{provider}' during exchange")]
    AccountNotFound {
        identifier: String,
        provider: String,
    },
}

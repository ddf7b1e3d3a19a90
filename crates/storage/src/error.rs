//! Storage error types and result alias.
//!
//! Every [`Store`](crate::Store) implementation maps its internal failures to
//! [`StorageError`]. Multi-key reads additionally report failures through
//! [`MultiGetFailure`], which distinguishes a proper error from a bare status
//! value handed back by the store.
//!
//! # Example
//!
//! ```
//! use modelgate_storage::{StorageError, StorageResult};
//!
//! fn lookup(key: &str) -> StorageResult<()> {
//!     Err(StorageError::not_found(key))
//! }
//!
//! assert_eq!(lookup("thing:abc").unwrap_err().to_string(), "thing:abc not in db");
//! ```

use std::sync::Arc;

use thiserror::Error;

/// A boxed error type for source chain tracking.
pub type BoxError = Arc<dyn std::error::Error + Send + Sync>;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
///
/// # Non-exhaustive
///
/// New variants may be added in minor releases. Downstream match expressions
/// must include a wildcard arm.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The requested key does not exist.
    #[error("{key} not in db")]
    NotFound {
        /// The key that was not found.
        key: String,
    },

    /// An insert targeted a key that already holds a value.
    #[error("{key} already in db")]
    KeyExists {
        /// The key that already exists.
        key: String,
    },

    /// The key exceeds the store's configured size limit.
    #[error("{kind} size {actual} exceeds limit {limit}")]
    SizeLimitExceeded {
        /// Which part of the request was too large.
        kind: &'static str,
        /// Observed size in bytes.
        actual: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Connection or network error.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
        /// The underlying error that caused this connection failure.
        #[source]
        source: Option<BoxError>,
    },

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
        /// The underlying error that caused serialization to fail.
        #[source]
        source: Option<BoxError>,
    },

    /// Store-specific failure that fits no other category.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
        /// The underlying error that caused this internal failure.
        #[source]
        source: Option<BoxError>,
    },

    /// Operation timed out.
    #[error("Operation timeout")]
    Timeout,
}

impl StorageError {
    /// Creates a new `NotFound` error for the given key.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a new `KeyExists` error for the given key.
    #[must_use]
    pub fn key_exists(key: impl Into<String>) -> Self {
        Self::KeyExists { key: key.into() }
    }

    /// Creates a new `SizeLimitExceeded` error.
    #[must_use]
    pub fn size_limit_exceeded(kind: &'static str, actual: usize, limit: usize) -> Self {
        Self::SizeLimitExceeded { kind, actual, limit }
    }

    /// Creates a new `Connection` error with the given message.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into(), source: None }
    }

    /// Creates a new `Connection` error with a message and source error.
    #[must_use]
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Serialization` error with a message and source error.
    #[must_use]
    pub fn serialization_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Serialization { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Internal` error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), source: None }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout() -> Self {
        Self::Timeout
    }

    /// Returns `true` for the "key does not exist" family of failures.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required string field was empty.
    #[error("{field} must not be empty")]
    Empty {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A numeric field is below its minimum.
    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum {
        /// Name of the offending field.
        field: &'static str,
        /// Smallest accepted value.
        min: String,
        /// Value that was supplied.
        value: String,
    },
}

/// Failure reported by [`Store::get_multi`](crate::Store::get_multi).
///
/// Some key-value clients fail a multi-key read with a proper error, others
/// with a bare status value (for example the number of keys that could not be
/// read). Both shapes are kept apart so the caller can normalize the second.
#[derive(Debug, Clone, Error)]
pub enum MultiGetFailure {
    /// A structured storage error.
    #[error(transparent)]
    Store(#[from] StorageError),

    /// A bare status value with no error detail attached.
    #[error("multi-get failed with raw status {0}")]
    Raw(serde_json::Value),
}

impl MultiGetFailure {
    /// Creates a raw failure from any JSON-representable status value.
    #[must_use]
    pub fn raw(value: impl Into<serde_json::Value>) -> Self {
        Self::Raw(value.into())
    }
}

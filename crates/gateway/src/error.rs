//! Gateway error types and result alias.
//!
//! Collaborator failures ([`StorageError`], [`ValidationError`],
//! [`IdGenerationError`]) pass through [`GatewayError`] transparently: the
//! message and source chain are those of the collaborator. A bare text failure
//! from a multi-key read is surfaced verbatim as [`GatewayError::Raw`]. Only
//! two variants originate in the gateway itself, [`GatewayError::AlreadyHasId`]
//! and [`GatewayError::NoSuchKey`].

use modelgate_storage::{BoxError, StorageError};
use thiserror::Error;

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors returned by [`ModelGateway`](crate::ModelGateway) operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The store rejected or failed the operation.
    #[error(transparent)]
    Store(#[from] StorageError),

    /// The validator rejected the model.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The identifier generator failed.
    #[error(transparent)]
    IdGeneration(#[from] IdGenerationError),

    /// `add` was called with a model that already carries an identifier.
    #[error("object already has an id")]
    AlreadyHasId,

    /// A multi-key read failed with a bare, non-text status value.
    #[error("No such key ({detail})")]
    NoSuchKey {
        /// The raw status value, rendered as JSON.
        detail: String,
    },

    /// A multi-key read failed with a bare text message.
    #[error("{message}")]
    Raw {
        /// The message exactly as the store produced it.
        message: String,
    },
}

impl GatewayError {
    /// Converts a raw multi-get failure value into a gateway error.
    ///
    /// Text passes through as [`GatewayError::Raw`] with the message
    /// unchanged. Any other value becomes [`GatewayError::NoSuchKey`].
    #[must_use]
    pub fn from_raw(raw: serde_json::Value) -> Self {
        match raw {
            serde_json::Value::String(message) => Self::Raw { message },
            other => Self::NoSuchKey { detail: other.to_string() },
        }
    }

    /// Returns the underlying storage error, if this is one.
    #[must_use]
    pub fn as_storage(&self) -> Option<&StorageError> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

/// Rejection produced by a [`Validator`](crate::Validator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A required field is absent.
    #[error("missing required field `{field}`")]
    MissingField {
        /// Name of the missing field.
        field: String,
    },

    /// The encoded model is larger than allowed.
    #[error("model size {size} exceeds limit {limit}")]
    TooLarge {
        /// Encoded size in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Free-form rejection from a custom validator.
    #[error("{message}")]
    Rejected {
        /// Why the model was rejected.
        message: String,
    },
}

impl ValidationError {
    /// Creates a free-form rejection.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected { message: message.into() }
    }
}

/// Failure produced by an [`IdGenerator`](crate::IdGenerator).
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum IdGenerationError {
    /// The generator has no identifiers left to hand out.
    #[error("identifier space exhausted")]
    Exhausted,

    /// Generation failed for a generator-specific reason.
    #[error("identifier generation failed: {message}")]
    Failed {
        /// Description of the failure.
        message: String,
        /// The underlying error, if any.
        #[source]
        source: Option<BoxError>,
    },
}

impl IdGenerationError {
    /// Creates a new `Failed` error with the given message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed { message: message.into(), source: None }
    }
}

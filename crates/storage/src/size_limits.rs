//! Key size validation for stores.
//!
//! Stores accept an optional [`SizeLimits`] at construction time and call
//! [`validate_key_size`] on every operation that takes a key.
//!
//! # Defaults
//!
//! | Limit | Default |
//! |-------|---------|
//! | `max_key_size` | 250 bytes |

use crate::{ConfigError, StorageError};

/// Default maximum key size in bytes.
pub const DEFAULT_MAX_KEY_SIZE: usize = 250;

/// Configurable size limits for keys.
///
/// # Example
///
/// ```
/// use modelgate_storage::SizeLimits;
///
/// let limits = SizeLimits::new(64).unwrap();
/// assert_eq!(limits.max_key_size(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    max_key_size: usize,
}

impl SizeLimits {
    /// Creates size limits with the given key bound.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BelowMinimum`] if the limit is zero.
    pub fn new(max_key_size: usize) -> Result<Self, ConfigError> {
        if max_key_size == 0 {
            return Err(ConfigError::BelowMinimum {
                field: "max_key_size",
                min: "1".into(),
                value: "0".into(),
            });
        }
        Ok(Self { max_key_size })
    }

    /// Returns the maximum allowed key size in bytes.
    #[must_use]
    pub fn max_key_size(&self) -> usize {
        self.max_key_size
    }
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self { max_key_size: DEFAULT_MAX_KEY_SIZE }
    }
}

/// Validates a key against the given limits.
///
/// # Errors
///
/// Returns [`StorageError::SizeLimitExceeded`] when the key is too long.
pub fn validate_key_size(key: &str, limits: &SizeLimits) -> Result<(), StorageError> {
    if key.len() > limits.max_key_size {
        return Err(StorageError::size_limit_exceeded("key", key.len(), limits.max_key_size));
    }
    Ok(())
}

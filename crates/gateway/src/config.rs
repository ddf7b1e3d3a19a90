//! Configuration for [`ModelGateway`](crate::ModelGateway).
//!
//! [`GatewayConfig`] is deserializable (for loading from a service's config
//! file) and buildable in code through a validating builder.
//!
//! # Example
//!
//! ```
//! use modelgate::{GatewayConfig, IdStrategy};
//!
//! let config = GatewayConfig::builder()
//!     .namespace("user")
//!     .id_strategy(IdStrategy::Sequence { start: 1 })
//!     .max_model_size(64 * 1024)
//!     .build()?;
//! assert_eq!(config.namespace().as_str(), "user");
//! # Ok::<(), modelgate::ConfigError>(())
//! ```

use std::sync::Arc;

use modelgate_storage::ConfigError;
use serde::{Deserialize, Serialize};

use crate::{
    id::{IdGenerator, SequenceGenerator, UuidGenerator},
    key::Namespace,
};

/// How new identifiers are produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum IdStrategy {
    /// Random UUID v4 text.
    #[default]
    Uuid,
    /// Increasing numbers starting at `start`.
    Sequence {
        /// First identifier handed out.
        #[serde(default)]
        start: u64,
    },
}

impl IdStrategy {
    /// Builds the generator for this strategy.
    #[must_use]
    pub fn generator(&self) -> Arc<dyn IdGenerator> {
        match self {
            Self::Uuid => Arc::new(UuidGenerator),
            Self::Sequence { start } => Arc::new(SequenceGenerator::new(*start)),
        }
    }
}

/// Configuration for a [`ModelGateway`](crate::ModelGateway).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Key prefix for every model of this gateway.
    pub(crate) namespace: Namespace,

    /// Identifier strategy used by `add`.
    #[serde(default)]
    pub(crate) id_strategy: IdStrategy,

    /// Upper bound on a model's encoded size, checked before the caller's validator.
    #[serde(default)]
    pub(crate) max_model_size: Option<usize>,
}

#[bon::bon]
impl GatewayConfig {
    /// Creates a new configuration, validating all fields.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Empty`] for an empty namespace.
    /// - [`ConfigError::BelowMinimum`] if `max_model_size` is zero.
    #[builder]
    pub fn new(
        #[builder(into)] namespace: String,
        #[builder(default)] id_strategy: IdStrategy,
        max_model_size: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let namespace = Namespace::new(namespace)?;
        let config = Self { namespace, id_strategy, max_model_size };
        config.validate()?;
        Ok(config)
    }

    /// Re-checks invariants that deserialization cannot express.
    ///
    /// # Errors
    ///
    /// [`ConfigError::BelowMinimum`] if `max_model_size` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_model_size == Some(0) {
            return Err(ConfigError::BelowMinimum {
                field: "max_model_size",
                min: "1".into(),
                value: "0".into(),
            });
        }
        Ok(())
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Returns the identifier strategy.
    #[must_use]
    pub fn id_strategy(&self) -> &IdStrategy {
        &self.id_strategy
    }

    /// Returns the model size limit, if any.
    #[must_use]
    pub fn max_model_size(&self) -> Option<usize> {
        self.max_model_size
    }
}

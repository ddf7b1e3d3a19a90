//! Model validation before writes.
//!
//! The gateway calls [`Validator::validate`] before every `set`, `add` and
//! `replace`, and writes whatever model the validator hands back. Built-in
//! validators:
//!
//! - [`AcceptAll`]: passes every model through unchanged
//! - [`RequiredFields`]: rejects models missing any of the named fields
//! - [`MaxModelSize`]: rejects models whose JSON encoding is too large
//! - [`Chain`]: runs several validators in order

use std::sync::Arc;

use async_trait::async_trait;
use modelgate_storage::Model;

use crate::error::ValidationError;

/// Validates, and may transform, a model before it is stored.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Returns the model to store, or the reason it must not be stored.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the rejection.
    async fn validate(&self, model: Model) -> Result<Model, ValidationError>;
}

#[async_trait]
impl<V: Validator + ?Sized> Validator for Arc<V> {
    async fn validate(&self, model: Model) -> Result<Model, ValidationError> {
        (**self).validate(model).await
    }
}

/// Accepts every model unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

#[async_trait]
impl Validator for AcceptAll {
    async fn validate(&self, model: Model) -> Result<Model, ValidationError> {
        Ok(model)
    }
}

/// Rejects models that lack any of a fixed set of fields.
///
/// A field holding JSON `null` counts as present.
#[derive(Debug, Clone, Default)]
pub struct RequiredFields {
    fields: Vec<String>,
}

impl RequiredFields {
    /// Creates a validator requiring every field in `fields`.
    pub fn new<I, F>(fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self { fields: fields.into_iter().map(Into::into).collect() }
    }
}

#[async_trait]
impl Validator for RequiredFields {
    async fn validate(&self, model: Model) -> Result<Model, ValidationError> {
        if let Some(missing) = self.fields.iter().find(|f| !model.contains_key(f.as_str())) {
            return Err(ValidationError::MissingField { field: missing.clone() });
        }
        Ok(model)
    }
}

/// Rejects models whose compact JSON encoding exceeds a byte limit.
#[derive(Debug, Clone, Copy)]
pub struct MaxModelSize {
    limit: usize,
}

impl MaxModelSize {
    /// Creates a validator allowing at most `limit` encoded bytes.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Returns the configured limit in bytes.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[async_trait]
impl Validator for MaxModelSize {
    async fn validate(&self, model: Model) -> Result<Model, ValidationError> {
        let size = serde_json::to_vec(&model)
            .map_err(|e| ValidationError::rejected(format!("model is not encodable: {e}")))?
            .len();
        if size > self.limit {
            return Err(ValidationError::TooLarge { size, limit: self.limit });
        }
        Ok(model)
    }
}

/// Runs validators in order, feeding each one's output to the next.
///
/// Stops at the first rejection.
#[derive(Clone, Default)]
pub struct Chain {
    validators: Vec<Arc<dyn Validator>>,
}

impl Chain {
    /// Creates an empty chain, equivalent to [`AcceptAll`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a validator to the chain.
    #[must_use]
    pub fn then(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Appends an already shared validator to the chain.
    #[must_use]
    pub fn then_shared(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Number of validators in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns `true` if the chain holds no validators.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain").field("len", &self.validators.len()).finish()
    }
}

#[async_trait]
impl Validator for Chain {
    async fn validate(&self, model: Model) -> Result<Model, ValidationError> {
        let mut model = model;
        for validator in &self.validators {
            model = validator.validate(model).await?;
        }
        Ok(model)
    }
}

//! Shared test utilities for gateway testing.
//!
//! Feature-gated behind `testutil`. Re-exports the storage crate's helpers so
//! integration tests need a single import path.
//!
//! ```no_run
//! // Requires the `testutil` feature to be enabled.
//! use modelgate::testutil::{memory_gateway, model, FailingIdGenerator};
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
pub use modelgate_storage::testutil::{
    FailingStore, MultiGetProbe, make_key, model, populated_store,
};
use modelgate_storage::{MemoryStore, Model};

use crate::{
    error::{IdGenerationError, ValidationError},
    gateway::ModelGateway,
    id::{IdGenerator, SequenceGenerator},
    key::Identifier,
    validate::{AcceptAll, Validator},
};

/// Namespace used by [`memory_gateway`].
pub const TEST_NAMESPACE: &str = "thing";

/// A gateway over a fresh [`MemoryStore`] in the `"thing"` namespace.
///
/// Identifiers are `"0"`, `"1"`, ... so tests can predict keys.
///
/// # Panics
///
/// Never in practice; the namespace is a valid constant.
#[must_use]
pub fn memory_gateway() -> ModelGateway<MemoryStore> {
    ModelGateway::new(TEST_NAMESPACE, MemoryStore::new(), AcceptAll)
        .expect("test namespace is valid")
        .with_id_generator(Arc::new(SequenceGenerator::new(0).textual()))
}

/// Returns the same identifier on every call and counts the calls.
#[derive(Debug)]
pub struct CountingIdGenerator {
    id: Identifier,
    calls: AtomicUsize,
}

impl CountingIdGenerator {
    /// Creates a generator always returning `id`.
    #[must_use]
    pub fn new(id: Identifier) -> Self {
        Self { id, calls: AtomicUsize::new(0) }
    }

    /// Number of `create_id` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdGenerator for CountingIdGenerator {
    async fn create_id(&self) -> Result<Identifier, IdGenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.id.clone())
    }
}

/// Fails every `create_id` call with a fixed message.
#[derive(Debug, Clone)]
pub struct FailingIdGenerator {
    message: String,
}

impl FailingIdGenerator {
    /// Creates a generator failing with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[async_trait]
impl IdGenerator for FailingIdGenerator {
    async fn create_id(&self) -> Result<Identifier, IdGenerationError> {
        Err(IdGenerationError::failed(self.message.clone()))
    }
}

/// Rejects every model with a fixed message.
#[derive(Debug, Clone)]
pub struct RejectAll {
    message: String,
}

impl RejectAll {
    /// Creates a validator rejecting with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[async_trait]
impl Validator for RejectAll {
    async fn validate(&self, _model: Model) -> Result<Model, ValidationError> {
        Err(ValidationError::rejected(self.message.clone()))
    }
}

/// Accepts every model after writing a fixed value into one field.
#[derive(Debug, Clone)]
pub struct StampingValidator {
    field: String,
    value: serde_json::Value,
}

impl StampingValidator {
    /// Creates a validator setting `field` to `value` on every model.
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self { field: field.into(), value: value.into() }
    }
}

#[async_trait]
impl Validator for StampingValidator {
    async fn validate(&self, mut model: Model) -> Result<Model, ValidationError> {
        model.insert(self.field.clone(), self.value.clone());
        Ok(model)
    }
}

/// Accepts every model and counts how many it has seen.
#[derive(Debug, Default)]
pub struct CountingValidator {
    calls: AtomicUsize,
}

impl CountingValidator {
    /// Number of `validate` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Validator for CountingValidator {
    async fn validate(&self, model: Model) -> Result<Model, ValidationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(model)
    }
}

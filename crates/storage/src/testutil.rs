//! Shared test utilities for store testing.
//!
//! Feature-gated behind `testutil` so it never leaks into production builds.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! modelgate-storage = { path = "../storage", features = ["testutil"] }
//! ```
//!
//! ```no_run
//! // Requires the `testutil` feature to be enabled.
//! use modelgate_storage::testutil::{model, populated_store, FailingStore};
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    backend::Store,
    error::{MultiGetFailure, StorageError, StorageResult},
    memory::MemoryStore,
    types::{Cas, Envelope, Model, MultiGetOptions, MultiGetResult},
};

/// Converts a JSON object literal into a [`Model`].
///
/// # Panics
///
/// Panics if `value` is not a JSON object.
#[must_use]
pub fn model(value: serde_json::Value) -> Model {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("test model must be a JSON object, got {other}"),
    }
}

/// Create a deterministic test key from a prefix and index, like `"prefix:000042"`.
#[must_use]
pub fn make_key(prefix: &str, idx: usize) -> String {
    format!("{prefix}:{idx:06}")
}

/// Create a [`MemoryStore`] pre-populated with `count` models.
///
/// Keys come from [`make_key`]; each model is `{"idx": <n>}`.
///
/// # Panics
///
/// Panics if any `upsert` fails (should not happen with `MemoryStore`).
pub async fn populated_store(prefix: &str, count: usize) -> MemoryStore {
    let store = MemoryStore::new();
    for i in 0..count {
        store
            .upsert(&make_key(prefix, i), model(serde_json::json!({ "idx": i })))
            .await
            .expect("populate upsert failed");
    }
    store
}

/// A store whose every operation fails with a fixed error.
#[derive(Debug, Clone)]
pub struct FailingStore {
    error: StorageError,
}

impl FailingStore {
    /// Creates a store failing with `error`.
    #[must_use]
    pub fn new(error: StorageError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn get(&self, _key: &str) -> StorageResult<Envelope> {
        Err(self.error.clone())
    }

    async fn insert(&self, _key: &str, _value: Model) -> StorageResult<Cas> {
        Err(self.error.clone())
    }

    async fn upsert(&self, _key: &str, _value: Model) -> StorageResult<Cas> {
        Err(self.error.clone())
    }

    async fn replace(&self, _key: &str, _value: Model) -> StorageResult<Cas> {
        Err(self.error.clone())
    }

    async fn remove(&self, _key: &str) -> StorageResult<Cas> {
        Err(self.error.clone())
    }

    async fn get_multi(
        &self,
        _keys: &[String],
        _options: Option<&MultiGetOptions>,
    ) -> Result<MultiGetResult, MultiGetFailure> {
        Err(MultiGetFailure::Store(self.error.clone()))
    }
}

/// A [`MemoryStore`] wrapper whose `get_multi` returns a fixed
/// [`MultiGetFailure`] and records the options it was given.
///
/// Single-key operations delegate to the inner store.
#[derive(Debug, Default)]
pub struct MultiGetProbe {
    inner: MemoryStore,
    failure: Option<MultiGetFailure>,
    seen_options: Mutex<Vec<Option<MultiGetOptions>>>,
    seen_keys: Mutex<Vec<Vec<String>>>,
}

impl MultiGetProbe {
    /// Wraps `inner`, passing multi-gets through.
    #[must_use]
    pub fn new(inner: MemoryStore) -> Self {
        Self { inner, ..Self::default() }
    }

    /// Creates a probe whose multi-gets always fail with `failure`.
    #[must_use]
    pub fn failing(failure: MultiGetFailure) -> Self {
        Self { failure: Some(failure), ..Self::default() }
    }

    /// Options received by each `get_multi` call, in call order.
    #[must_use]
    pub fn seen_options(&self) -> Vec<Option<MultiGetOptions>> {
        self.seen_options.lock().clone()
    }

    /// Keys received by each `get_multi` call, in call order.
    #[must_use]
    pub fn seen_keys(&self) -> Vec<Vec<String>> {
        self.seen_keys.lock().clone()
    }
}

#[async_trait]
impl Store for MultiGetProbe {
    async fn get(&self, key: &str) -> StorageResult<Envelope> {
        self.inner.get(key).await
    }

    async fn insert(&self, key: &str, value: Model) -> StorageResult<Cas> {
        self.inner.insert(key, value).await
    }

    async fn upsert(&self, key: &str, value: Model) -> StorageResult<Cas> {
        self.inner.upsert(key, value).await
    }

    async fn replace(&self, key: &str, value: Model) -> StorageResult<Cas> {
        self.inner.replace(key, value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<Cas> {
        self.inner.remove(key).await
    }

    async fn get_multi(
        &self,
        keys: &[String],
        options: Option<&MultiGetOptions>,
    ) -> Result<MultiGetResult, MultiGetFailure> {
        self.seen_options.lock().push(options.cloned());
        self.seen_keys.lock().push(keys.to_vec());
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => self.inner.get_multi(keys, options).await,
        }
    }
}

/// Assert that a [`StorageResult`] is a [`StorageError::NotFound`].
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use modelgate_storage::assert_not_found;
/// use modelgate_storage::{StorageError, StorageResult};
///
/// let result: StorageResult<()> = Err(StorageError::not_found("missing"));
/// assert_not_found!(result);
/// ```
#[macro_export]
macro_rules! assert_not_found {
    ($result:expr) => {
        assert!(
            matches!($result, Err($crate::StorageError::NotFound { .. })),
            "expected StorageError::NotFound, got: {:?}",
            $result,
        );
    };
    ($result:expr, $msg:expr) => {
        assert!(
            matches!($result, Err($crate::StorageError::NotFound { .. })),
            "{}: expected StorageError::NotFound, got: {:?}",
            $msg,
            $result,
        );
    };
}

/// Assert that a [`StorageResult`] is a [`StorageError::KeyExists`].
#[macro_export]
macro_rules! assert_key_exists {
    ($result:expr) => {
        assert!(
            matches!($result, Err($crate::StorageError::KeyExists { .. })),
            "expected StorageError::KeyExists, got: {:?}",
            $result,
        );
    };
}

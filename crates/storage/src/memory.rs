//! In-memory store implementation.
//!
//! [`MemoryStore`] implements [`Store`] on top of a [`BTreeMap`] guarded by a
//! [`parking_lot::RwLock`]. It is the reference implementation of the write
//! semantics documented on [`Store`] and the store used throughout the test
//! suites.
//!
//! # Example
//!
//! ```
//! use modelgate_storage::{MemoryStore, Model, Store};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryStore::new();
//!
//!     let first = store.upsert("greeting", Model::new()).await.unwrap();
//!     let second = store.upsert("greeting", Model::new()).await.unwrap();
//!
//!     assert!(second > first);
//! }
//! ```
//!
//! # Limitations
//!
//! - Data is not persisted; all data is lost when the last clone is dropped
//! - No replication or distributed features

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::trace;

use crate::{
    backend::Store,
    error::{MultiGetFailure, StorageError, StorageResult},
    size_limits::{SizeLimits, validate_key_size},
    types::{Cas, Envelope, Model, MultiGetOptions, MultiGetResult},
};

/// In-memory store using a [`BTreeMap`].
///
/// # Cloning
///
/// `MemoryStore` is cheaply cloneable via [`Arc`]. All clones share the same
/// underlying data and CAS counter.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    data: Arc<RwLock<BTreeMap<String, Envelope>>>,
    next_cas: Arc<AtomicU64>,
    limits: SizeLimits,
}

impl MemoryStore {
    /// Creates an empty store with default [`SizeLimits`].
    pub fn new() -> Self {
        Self::with_limits(SizeLimits::default())
    }

    /// Creates an empty store enforcing the given key limits.
    pub fn with_limits(limits: SizeLimits) -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
            next_cas: Arc::new(AtomicU64::new(1)),
            limits,
        }
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns `true` if the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Returns all stored keys in order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    /// Verifies the store is not deadlocked by briefly taking the read lock.
    pub fn health_check(&self) -> StorageResult<()> {
        let _unused = self.data.read();
        Ok(())
    }

    fn next_cas(&self) -> Cas {
        Cas(self.next_cas.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    #[tracing::instrument(skip(self))]
    async fn get(&self, key: &str) -> StorageResult<Envelope> {
        validate_key_size(key, &self.limits)?;

        let data = self.data.read();
        data.get(key).cloned().ok_or_else(|| StorageError::not_found(key))
    }

    #[tracing::instrument(skip(self, value))]
    async fn insert(&self, key: &str, value: Model) -> StorageResult<Cas> {
        validate_key_size(key, &self.limits)?;

        let mut data = self.data.write();
        if data.contains_key(key) {
            return Err(StorageError::key_exists(key));
        }

        let cas = self.next_cas();
        data.insert(key.to_owned(), Envelope::new(value, cas));
        Ok(cas)
    }

    #[tracing::instrument(skip(self, value))]
    async fn upsert(&self, key: &str, value: Model) -> StorageResult<Cas> {
        validate_key_size(key, &self.limits)?;

        let mut data = self.data.write();
        let cas = self.next_cas();
        data.insert(key.to_owned(), Envelope::new(value, cas));
        Ok(cas)
    }

    #[tracing::instrument(skip(self, value))]
    async fn replace(&self, key: &str, value: Model) -> StorageResult<Cas> {
        validate_key_size(key, &self.limits)?;

        let mut data = self.data.write();
        let Some(slot) = data.get_mut(key) else {
            return Err(StorageError::not_found(key));
        };

        let cas = self.next_cas();
        *slot = Envelope::new(value, cas);
        Ok(cas)
    }

    #[tracing::instrument(skip(self))]
    async fn remove(&self, key: &str) -> StorageResult<Cas> {
        validate_key_size(key, &self.limits)?;

        let mut data = self.data.write();
        data.remove(key).map(|envelope| envelope.cas).ok_or_else(|| StorageError::not_found(key))
    }

    #[tracing::instrument(skip(self, keys, options), fields(count = keys.len()))]
    async fn get_multi(
        &self,
        keys: &[String],
        options: Option<&MultiGetOptions>,
    ) -> Result<MultiGetResult, MultiGetFailure> {
        for key in keys {
            validate_key_size(key, &self.limits)?;
        }

        // A zero batch size would never make progress; treat it as unbatched.
        let batch_size = options
            .and_then(|o| o.batch_size)
            .filter(|&n| n > 0)
            .unwrap_or(keys.len().max(1));

        let mut results = MultiGetResult::with_capacity(keys.len());
        for (batch_idx, batch) in keys.chunks(batch_size).enumerate() {
            trace!(batch = batch_idx, size = batch.len(), "reading multi-get batch");
            let data = self.data.read();
            for key in batch {
                results.insert(key.clone(), data.get(key).cloned());
            }
        }

        Ok(results)
    }
}

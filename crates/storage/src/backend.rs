//! Store trait definition.
//!
//! [`Store`] is the narrow contract the model layer consumes. Every operation
//! is asynchronous and resolves exactly once.
//!
//! # Write semantics
//!
//! | Method | Key absent | Key present |
//! |--------|------------|-------------|
//! | [`insert`](Store::insert) | stores | [`KeyExists`](crate::StorageError::KeyExists) |
//! | [`upsert`](Store::upsert) | stores | overwrites |
//! | [`replace`](Store::replace) | [`NotFound`](crate::StorageError::NotFound) | overwrites |
//! | [`remove`](Store::remove) | [`NotFound`](crate::StorageError::NotFound) | deletes |
//!
//! Keys are opaque strings. Domain concerns such as namespacing belong to the
//! layer built on top of this trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::{MultiGetFailure, StorageResult},
    types::{Cas, Envelope, Model, MultiGetOptions, MultiGetResult},
};

/// Asynchronous key-value store holding [`Model`] values.
///
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```
/// use modelgate_storage::{MemoryStore, Model, Store};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let store = MemoryStore::new();
///
/// store.insert("user:1", Model::new()).await.unwrap();
/// assert!(store.insert("user:1", Model::new()).await.is_err());
///
/// let envelope = store.get("user:1").await.unwrap();
/// assert!(envelope.value.is_empty());
/// # });
/// ```
#[async_trait]
pub trait Store: Send + Sync {
    /// Retrieves the value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`](crate::StorageError::NotFound) when the key is absent.
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn get(&self, key: &str) -> StorageResult<Envelope>;

    /// Stores `value` under a key that must not exist yet.
    ///
    /// # Errors
    ///
    /// [`StorageError::KeyExists`](crate::StorageError::KeyExists) when the key is present.
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn insert(&self, key: &str, value: Model) -> StorageResult<Cas>;

    /// Stores `value` under `key`, overwriting any previous value.
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn upsert(&self, key: &str, value: Model) -> StorageResult<Cas>;

    /// Overwrites the value under a key that must already exist.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`](crate::StorageError::NotFound) when the key is absent.
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn replace(&self, key: &str, value: Model) -> StorageResult<Cas>;

    /// Deletes a key that must exist.
    ///
    /// Returns the token of the deleted value.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`](crate::StorageError::NotFound) when the key is absent.
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn remove(&self, key: &str) -> StorageResult<Cas>;

    /// Retrieves several keys in one call.
    ///
    /// The result holds one entry per requested key; absent keys map to
    /// `None`. The map has no defined order.
    ///
    /// # Errors
    ///
    /// A [`MultiGetFailure`], either a structured error or a bare status value.
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn get_multi(
        &self,
        keys: &[String],
        options: Option<&MultiGetOptions>,
    ) -> Result<MultiGetResult, MultiGetFailure>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for Arc<S> {
    async fn get(&self, key: &str) -> StorageResult<Envelope> {
        (**self).get(key).await
    }

    async fn insert(&self, key: &str, value: Model) -> StorageResult<Cas> {
        (**self).insert(key, value).await
    }

    async fn upsert(&self, key: &str, value: Model) -> StorageResult<Cas> {
        (**self).upsert(key, value).await
    }

    async fn replace(&self, key: &str, value: Model) -> StorageResult<Cas> {
        (**self).replace(key, value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<Cas> {
        (**self).remove(key).await
    }

    async fn get_multi(
        &self,
        keys: &[String],
        options: Option<&MultiGetOptions>,
    ) -> Result<MultiGetResult, MultiGetFailure> {
        (**self).get_multi(keys, options).await
    }
}

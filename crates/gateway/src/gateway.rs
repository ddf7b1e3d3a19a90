//! The model gateway: namespaced CRUD over a [`Store`].
//!
//! [`ModelGateway`] composes three collaborators:
//!
//! - a [`Store`] holding the models,
//! - a [`Validator`] consulted before every write,
//! - an [`IdGenerator`] consulted by [`add`](ModelGateway::add).
//!
//! The gateway holds no mutable state of its own. Compound operations
//! ([`add`](ModelGateway::add), [`update`](ModelGateway::update)) are not
//! transactional: a concurrent writer can interleave between their steps.
//!
//! # Example
//!
//! ```
//! use modelgate::{AcceptAll, ModelGateway};
//! use modelgate_storage::{MemoryStore, Model};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let users = ModelGateway::new("user", MemoryStore::new(), AcceptAll).unwrap();
//!
//! let mut alice = Model::new();
//! alice.insert("name".into(), "Alice".into());
//!
//! let stored = users.add(alice).await.unwrap();
//! let id = stored["id"].as_str().unwrap().to_owned();
//!
//! let fetched = users.get(id.as_str()).await.unwrap();
//! assert_eq!(fetched, stored);
//! # });
//! ```

use std::{fmt, sync::Arc};

use modelgate_storage::{Envelope, Model, MultiGetFailure, MultiGetOptions, Store};
use tracing::{debug, field};

use crate::{
    config::GatewayConfig,
    error::{GatewayError, GatewayResult},
    id::{IdGenerator, UuidGenerator},
    key::{ID_FIELD, Identifier, Namespace, has_identity},
    validate::{Chain, MaxModelSize, Validator},
};

/// Namespaced model persistence over a [`Store`].
///
/// Cheap to clone when the store is; clones share collaborators.
#[derive(Clone)]
pub struct ModelGateway<S> {
    namespace: Namespace,
    store: S,
    validator: Arc<dyn Validator>,
    id_generator: Arc<dyn IdGenerator>,
}

impl<S> fmt::Debug for ModelGateway<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelGateway").field("namespace", &self.namespace).finish_non_exhaustive()
    }
}

impl<S: Store> ModelGateway<S> {
    /// Creates a gateway generating UUID identifiers.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](modelgate_storage::ConfigError) if `namespace`
    /// is empty.
    pub fn new(
        namespace: impl Into<String>,
        store: S,
        validator: impl Validator + 'static,
    ) -> Result<Self, modelgate_storage::ConfigError> {
        Ok(Self::with_namespace(Namespace::new(namespace)?, store, Arc::new(validator)))
    }

    /// Creates a gateway from an already validated namespace.
    pub fn with_namespace(namespace: Namespace, store: S, validator: Arc<dyn Validator>) -> Self {
        Self { namespace, store, validator, id_generator: Arc::new(UuidGenerator) }
    }

    /// Creates a gateway from configuration.
    ///
    /// When `max_model_size` is set, a [`MaxModelSize`] check runs before
    /// `validator`.
    pub fn from_config(
        config: &GatewayConfig,
        store: S,
        validator: impl Validator + 'static,
    ) -> Self {
        let validator: Arc<dyn Validator> = match config.max_model_size() {
            Some(limit) => Arc::new(Chain::new().then(MaxModelSize::new(limit)).then(validator)),
            None => Arc::new(validator),
        };
        Self::with_namespace(config.namespace().clone(), store, validator)
            .with_id_generator(config.id_strategy().generator())
    }

    /// Replaces the identifier generator used by [`add`](Self::add).
    #[must_use]
    pub fn with_id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = id_generator;
        self
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Builds the storage key for `id`.
    #[must_use]
    pub fn key_for(&self, id: &Identifier) -> String {
        self.namespace.key_for(id)
    }

    /// Resolves the storage key for a model.
    ///
    /// With a `candidate` identifier, returns its key and leaves `model`
    /// untouched. Without one, asks the generator for a fresh identifier
    /// (exactly once), writes it into `model["id"]` when a model is given,
    /// and returns the key.
    ///
    /// # Errors
    ///
    /// [`GatewayError::IdGeneration`] if the generator fails; `model` is then
    /// left untouched.
    #[tracing::instrument(skip_all, fields(namespace = %self.namespace, key = field::Empty))]
    pub async fn create_key(
        &self,
        candidate: Option<Identifier>,
        model: Option<&mut Model>,
    ) -> GatewayResult<String> {
        let id = match candidate {
            Some(id) => id,
            None => {
                let id = self.id_generator.create_id().await?;
                debug!(%id, "generated identifier");
                if let Some(model) = model {
                    model.insert(ID_FIELD.to_owned(), id.clone().into());
                }
                id
            },
        };

        let key = self.key_for(&id);
        tracing::Span::current().record("key", key.as_str());
        Ok(key)
    }

    /// Validates `model` and stores it under `id`, overwriting any previous value.
    ///
    /// Returns the validated model.
    ///
    /// # Errors
    ///
    /// Validator and store errors, unchanged.
    #[tracing::instrument(skip_all, fields(namespace = %self.namespace, key = field::Empty))]
    pub async fn set(&self, id: impl Into<Identifier>, model: Model) -> GatewayResult<Model> {
        let key = self.key_for(&id.into());
        tracing::Span::current().record("key", key.as_str());

        let model = self.validator.validate(model).await?;
        self.store.upsert(&key, model.clone()).await?;
        Ok(model)
    }

    /// Assigns a fresh identifier to `model`, validates it and inserts it.
    ///
    /// Returns the validated model, whose `id` field holds the new identifier.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::AlreadyHasId`] if `model` already carries an identifier.
    /// - Generator, validator and store errors, unchanged. Nothing is validated or stored when
    ///   generation fails.
    #[tracing::instrument(skip_all, fields(namespace = %self.namespace, key = field::Empty))]
    pub async fn add(&self, mut model: Model) -> GatewayResult<Model> {
        if has_identity(&model) {
            debug!("refusing to add a model that already has an id");
            return Err(GatewayError::AlreadyHasId);
        }

        let key = self.create_key(None, Some(&mut model)).await?;
        tracing::Span::current().record("key", key.as_str());

        let model = self.validator.validate(model).await?;
        self.store.insert(&key, model.clone()).await?;
        Ok(model)
    }

    /// Fetches the model stored under `id`, without store metadata.
    ///
    /// # Errors
    ///
    /// Store errors, unchanged; a missing key surfaces the store's not-found error.
    #[tracing::instrument(skip_all, fields(namespace = %self.namespace, key = field::Empty))]
    pub async fn get(&self, id: impl Into<Identifier>) -> GatewayResult<Model> {
        let key = self.key_for(&id.into());
        tracing::Span::current().record("key", key.as_str());

        let envelope = self.store.get(&key).await?;
        Ok(envelope.into_value())
    }

    /// Removes the model stored under `id`.
    ///
    /// # Errors
    ///
    /// Store errors, unchanged; removing a missing key fails.
    #[tracing::instrument(skip_all, fields(namespace = %self.namespace, key = field::Empty))]
    pub async fn remove(&self, id: impl Into<Identifier>) -> GatewayResult<()> {
        let key = self.key_for(&id.into());
        tracing::Span::current().record("key", key.as_str());

        self.store.remove(&key).await?;
        Ok(())
    }

    /// Validates `model` and overwrites the existing model under `id`.
    ///
    /// Returns the validated model.
    ///
    /// # Errors
    ///
    /// Validator and store errors, unchanged; replacing a missing key fails.
    #[tracing::instrument(skip_all, fields(namespace = %self.namespace, key = field::Empty))]
    pub async fn replace(&self, id: impl Into<Identifier>, model: Model) -> GatewayResult<Model> {
        let key = self.key_for(&id.into());
        tracing::Span::current().record("key", key.as_str());

        let model = self.validator.validate(model).await?;
        self.store.replace(&key, model.clone()).await?;
        Ok(model)
    }

    /// Merges `partial` into the model stored under `id` and replaces it.
    ///
    /// The merge is shallow: each top-level field of `partial` overwrites the
    /// stored field of the same name. The `id` field is never overwritten; an
    /// `id` in `partial` is discarded.
    ///
    /// # Errors
    ///
    /// Store errors from the read (including not-found) and validator or store
    /// errors from the replace, unchanged.
    #[tracing::instrument(skip_all, fields(namespace = %self.namespace))]
    pub async fn update(&self, id: impl Into<Identifier>, partial: Model) -> GatewayResult<Model> {
        let id = id.into();
        let mut merged = self.get(&id).await?;

        for (field, value) in partial {
            if field == ID_FIELD {
                continue;
            }
            merged.insert(field, value);
        }

        self.replace(id, merged).await
    }

    /// Fetches several models, in the order of `ids`.
    ///
    /// Missing models yield `None` at their position.
    ///
    /// # Errors
    ///
    /// - Store errors, unchanged.
    /// - [`GatewayError::Raw`] when the store fails with a bare text message.
    /// - [`GatewayError::NoSuchKey`] when it fails with any other bare value.
    pub async fn get_multi<I>(&self, ids: I) -> GatewayResult<Vec<Option<Model>>>
    where
        I: IntoIterator,
        I::Item: Into<Identifier>,
    {
        self.get_multi_with_options(ids, None).await
    }

    /// Like [`get_multi`](Self::get_multi), forwarding `options` to the store untouched.
    ///
    /// # Errors
    ///
    /// See [`get_multi`](Self::get_multi).
    #[tracing::instrument(skip_all, fields(namespace = %self.namespace, count = field::Empty))]
    pub async fn get_multi_with_options<I>(
        &self,
        ids: I,
        options: Option<&MultiGetOptions>,
    ) -> GatewayResult<Vec<Option<Model>>>
    where
        I: IntoIterator,
        I::Item: Into<Identifier>,
    {
        let keys: Vec<String> = ids.into_iter().map(|id| self.key_for(&id.into())).collect();
        tracing::Span::current().record("count", keys.len());

        let found = match self.store.get_multi(&keys, options).await {
            Ok(found) => found,
            Err(MultiGetFailure::Store(err)) => return Err(err.into()),
            Err(MultiGetFailure::Raw(raw)) => {
                debug!(%raw, "converting raw multi-get failure");
                return Err(GatewayError::from_raw(raw));
            },
        };

        Ok(keys
            .iter()
            .map(|key| found.get(key).cloned().flatten().map(Envelope::into_value))
            .collect())
    }
}

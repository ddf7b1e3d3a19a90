//! Common types exchanged between stores and their consumers.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

/// A stored record: an open-ended mapping from field name to JSON value.
pub type Model = serde_json::Map<String, serde_json::Value>;

/// Result of a multi-key read, keyed by storage key.
///
/// A `None` entry means the key was requested but holds no value.
pub type MultiGetResult = HashMap<String, Option<Envelope>>;

/// Concurrency token attached to every stored value.
///
/// Tokens increase monotonically across all writes to a store. Two reads of
/// the same key return the same token only if no write happened in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cas(pub u64);

impl fmt::Display for Cas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Cas {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A stored value together with its store metadata.
///
/// # Examples
///
/// ```
/// use modelgate_storage::{Cas, Envelope, Model};
///
/// let envelope = Envelope::new(Model::new(), Cas(7));
/// assert_eq!(envelope.cas, Cas(7));
/// let value: Model = envelope.into_value();
/// assert!(value.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// The stored value.
    pub value: Model,

    /// Token identifying the write that produced `value`.
    pub cas: Cas,
}

impl Envelope {
    /// Creates a new envelope.
    pub fn new(value: Model, cas: Cas) -> Self {
        Self { value, cas }
    }

    /// Discards the metadata and returns the stored value.
    #[must_use]
    pub fn into_value(self) -> Model {
        self.value
    }
}

/// Options for [`Store::get_multi`](crate::Store::get_multi).
///
/// Consumers forward these untouched; only the store interprets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultiGetOptions {
    /// Number of keys to read per round trip. `None` reads all keys at once.
    #[serde(default)]
    pub batch_size: Option<usize>,
}

impl MultiGetOptions {
    /// Returns options that read `batch_size` keys per round trip.
    #[must_use]
    pub fn batched(batch_size: usize) -> Self {
        Self { batch_size: Some(batch_size) }
    }
}

//! Identifiers, namespaces and storage key construction.
//!
//! Every key handed to a [`Store`](modelgate_storage::Store) has the form
//! `<namespace>:<identifier>`. The namespace is validated once, when the
//! gateway is built, so key construction itself cannot fail.

use std::fmt;

use modelgate_storage::{ConfigError, Model};
use serde::{Deserialize, Serialize};

/// Separator between namespace and identifier in a storage key.
pub const KEY_SEPARATOR: char = ':';

/// Name of the model field that carries the identifier.
pub const ID_FIELD: &str = "id";

/// Opaque model identifier, either text or a number.
///
/// # Examples
///
/// ```
/// use modelgate::Identifier;
///
/// assert_eq!(Identifier::from("abc").to_string(), "abc");
/// assert_eq!(Identifier::from(42u64).to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Numeric identifier, stored as a JSON number.
    Number(u64),
    /// Text identifier, stored as a JSON string.
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<&Identifier> for Identifier {
    fn from(value: &Identifier) -> Self {
        value.clone()
    }
}

impl From<Identifier> for serde_json::Value {
    fn from(value: Identifier) -> Self {
        match value {
            Identifier::Number(n) => serde_json::Value::from(n),
            Identifier::Text(s) => serde_json::Value::String(s),
        }
    }
}

/// Validated key prefix shared by every model of one gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Namespace(String);

impl Namespace {
    /// Validates and wraps a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Empty`] if `name` is empty. Any other string,
    /// including one containing [`KEY_SEPARATOR`], is accepted.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::Empty { field: "namespace" });
        }
        Ok(Self(name))
    }

    /// Returns the namespace as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the storage key for `id`.
    ///
    /// ```
    /// use modelgate::{Identifier, Namespace};
    ///
    /// let ns = Namespace::new("thing").unwrap();
    /// assert_eq!(ns.key_for(&Identifier::from("abc")), "thing:abc");
    /// ```
    #[must_use]
    pub fn key_for(&self, id: &Identifier) -> String {
        format!("{}{KEY_SEPARATOR}{id}", self.0)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Namespace {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl From<Namespace> for String {
    fn from(namespace: Namespace) -> Self {
        namespace.0
    }
}

/// Returns `true` if `model` carries a usable identifier.
///
/// An `id` of `null`, `false`, `0` or `""` counts as absent.
#[must_use]
pub fn has_identity(model: &Model) -> bool {
    use serde_json::Value;

    match model.get(ID_FIELD) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

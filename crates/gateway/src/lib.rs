//! Namespaced model persistence over an asynchronous key-value store.
//!
//! [`ModelGateway`] turns a [`Store`](modelgate_storage::Store) into a
//! CRUD surface for JSON models. Every model lives under a storage key of the
//! form `<namespace>:<id>`; writes pass through a pluggable [`Validator`];
//! new models get identifiers from a pluggable [`IdGenerator`].
//!
//! # Operations
//!
//! | Method | Store call | Key must |
//! |--------|------------|----------|
//! | [`set`](ModelGateway::set) | `upsert` | — |
//! | [`add`](ModelGateway::add) | `insert` | be absent (id generated) |
//! | [`get`](ModelGateway::get) | `get` | exist |
//! | [`remove`](ModelGateway::remove) | `remove` | exist |
//! | [`replace`](ModelGateway::replace) | `replace` | exist |
//! | [`update`](ModelGateway::update) | `get` then `replace` | exist |
//! | [`get_multi`](ModelGateway::get_multi) | `get_multi` | — |
//!
//! # Error Handling
//!
//! All operations return [`GatewayResult<T>`]. Collaborator failures are
//! passed through unchanged; see [`GatewayError`].
//!
//! # Feature Flags
//!
//! - **`testutil`**: Enables the `testutil` module (scripted generators, rejecting validators, a
//!   ready-made in-memory gateway).

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod id;
pub mod key;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used, clippy::panic)]
pub mod testutil;
pub mod validate;

pub use config::{GatewayConfig, IdStrategy};
pub use error::{GatewayError, GatewayResult, IdGenerationError, ValidationError};
pub use gateway::ModelGateway;
pub use id::{IdGenerator, SequenceGenerator, UuidGenerator};
pub use key::{ID_FIELD, Identifier, KEY_SEPARATOR, Namespace, has_identity};
pub use modelgate_storage::{ConfigError, Model};
pub use validate::{AcceptAll, Chain, MaxModelSize, RequiredFields, Validator};

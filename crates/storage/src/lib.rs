//! Asynchronous key-value store contract for modelgate.
//!
//! This crate defines the [`Store`] trait consumed by the model gateway, the
//! types that cross it ([`Model`], [`Envelope`], [`Cas`], [`MultiGetOptions`])
//! and [`MemoryStore`], an in-memory reference implementation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  modelgate                   │
//! │   ModelGateway (keys, ids, validation)       │
//! ├──────────────────────────────────────────────┤
//! │              modelgate-storage               │
//! │  Store trait (get, insert, upsert, replace,  │
//! │               remove, get_multi)             │
//! ├──────────────────────┬───────────────────────┤
//! │     MemoryStore      │   external clients    │
//! │  (testing, dev)      │   (production)        │
//! └──────────────────────┴───────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use modelgate_storage::{MemoryStore, Model, Store};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new();
//!
//!     let mut user = Model::new();
//!     user.insert("name".into(), "Alice".into());
//!     store.insert("user:123", user.clone()).await?;
//!
//!     let envelope = store.get("user:123").await?;
//!     assert_eq!(envelope.value, user);
//!     Ok(())
//! }
//! ```
//!
//! # Implementing a Store
//!
//! 1. Implement the [`Store`] trait
//! 2. Map client-specific errors to [`StorageError`]
//! 3. Report multi-key failures as [`MultiGetFailure::Store`] when a structured error is
//!    available, and as [`MultiGetFailure::Raw`] when the client only hands back a status value
//!
//! # Feature Flags
//!
//! - **`testutil`**: Enables the `testutil` module with shared helpers (model builders, failing
//!   stores, assertion macros). Enable this in `[dev-dependencies]` for integration tests.

#![deny(unsafe_code)]

pub mod backend;
pub mod error;
pub mod memory;
pub mod size_limits;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used, clippy::panic)]
pub mod testutil;
pub mod types;

// Re-export primary types at crate root for convenience
pub use backend::Store;
pub use error::{BoxError, ConfigError, MultiGetFailure, StorageError, StorageResult};
pub use memory::MemoryStore;
pub use size_limits::{DEFAULT_MAX_KEY_SIZE, SizeLimits, validate_key_size};
pub use types::{Cas, Envelope, Model, MultiGetOptions, MultiGetResult};

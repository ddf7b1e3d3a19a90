//! Identifier generation for newly added models.
//!
//! [`IdGenerator`] is the collaborator [`ModelGateway::add`](crate::ModelGateway::add)
//! calls exactly once per model. Two generators ship with the crate:
//!
//! | Generator | Identifiers |
//! |-----------|-------------|
//! | [`UuidGenerator`] | random UUID v4 text (default) |
//! | [`SequenceGenerator`] | increasing numbers from a configurable start |

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{error::IdGenerationError, key::Identifier};

/// Produces unique identifiers.
#[async_trait]
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns an [`IdGenerationError`] when no identifier can be produced.
    async fn create_id(&self) -> Result<Identifier, IdGenerationError>;
}

#[async_trait]
impl<G: IdGenerator + ?Sized> IdGenerator for Arc<G> {
    async fn create_id(&self) -> Result<Identifier, IdGenerationError> {
        (**self).create_id().await
    }
}

/// Random UUID v4 identifiers in hyphenated text form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

#[async_trait]
impl IdGenerator for UuidGenerator {
    async fn create_id(&self) -> Result<Identifier, IdGenerationError> {
        Ok(Identifier::Text(Uuid::new_v4().to_string()))
    }
}

/// Monotonically increasing identifiers.
///
/// Clones share the same counter.
///
/// # Example
///
/// ```
/// use modelgate::{Identifier, IdGenerator, SequenceGenerator};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let ids = SequenceGenerator::new(10);
/// assert_eq!(ids.create_id().await.unwrap(), Identifier::Number(10));
/// assert_eq!(ids.create_id().await.unwrap(), Identifier::Number(11));
///
/// let text = SequenceGenerator::new(0).textual();
/// assert_eq!(text.create_id().await.unwrap(), Identifier::from("0"));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    next: Arc<AtomicU64>,
    textual: bool,
}

impl SequenceGenerator {
    /// Creates a generator whose first identifier is `start`.
    #[must_use]
    pub fn new(start: u64) -> Self {
        Self { next: Arc::new(AtomicU64::new(start)), textual: false }
    }

    /// Emits identifiers as decimal text instead of numbers.
    #[must_use]
    pub fn textual(mut self) -> Self {
        self.textual = true;
        self
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl IdGenerator for SequenceGenerator {
    async fn create_id(&self) -> Result<Identifier, IdGenerationError> {
        // `u64::MAX` is never handed out; it marks the sequence as spent.
        let n = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
            .map_err(|_| IdGenerationError::Exhausted)?;

        Ok(if self.textual { Identifier::Text(n.to_string()) } else { Identifier::Number(n) })
    }
}

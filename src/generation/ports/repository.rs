//! Repository port for generation record persistence.

use crate::generation::domain::{Generation, GenerationId, OwnerId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for generation repository operations.
pub type GenerationRepositoryResult<T> = Result<T, GenerationRepositoryError>;

/// Generation persistence contract.
///
/// Implementations must tolerate concurrent calls on distinct records.
#[async_trait]
pub trait GenerationRepository: Send + Sync {
    /// Stores a new generation.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationRepositoryError::DuplicateGeneration`] when the
    /// identifier already exists.
    async fn store(&self, generation: &Generation) -> GenerationRepositoryResult<()>;

    /// Persists the terminal status of a pending generation.
    ///
    /// Only the status, generated tests, and update timestamp are written.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationRepositoryError::NotFound`] when the generation
    /// does not exist, or [`GenerationRepositoryError::AlreadyFinalised`]
    /// when the stored record is no longer pending.
    async fn update(&self, generation: &Generation) -> GenerationRepositoryResult<()>;

    /// Finds a generation by identifier.
    ///
    /// Returns `None` when the generation does not exist.
    async fn find_by_id(&self, id: GenerationId) -> GenerationRepositoryResult<Option<Generation>>;

    /// Returns every generation owned by `owner_id`, newest first.
    async fn find_by_owner(&self, owner_id: OwnerId)
    -> GenerationRepositoryResult<Vec<Generation>>;
}

/// Errors returned by generation repository implementations.
#[derive(Debug, Clone, Error)]
pub enum GenerationRepositoryError {
    /// A generation with the same identifier already exists.
    #[error("duplicate generation identifier: {0}")]
    DuplicateGeneration(GenerationId),

    /// The generation was not found.
    #[error("generation not found: {0}")]
    NotFound(GenerationId),

    /// The stored generation already reached a terminal status.
    #[error("generation {0} is no longer pending")]
    AlreadyFinalised(GenerationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl GenerationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

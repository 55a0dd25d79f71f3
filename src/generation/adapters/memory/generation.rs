//! In-memory generation repository for tests and offline runs.

use crate::generation::{
    domain::{Generation, GenerationId, GenerationStatus, OwnerId},
    ports::{GenerationRepository, GenerationRepositoryError, GenerationRepositoryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory generation repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGenerationRepository {
    state: Arc<RwLock<InMemoryGenerationState>>,
}

#[derive(Debug, Default)]
struct InMemoryGenerationState {
    generations: HashMap<GenerationId, Generation>,
    owner_index: HashMap<OwnerId, Vec<GenerationId>>,
}

impl InMemoryGenerationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored generations.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the lock is poisoned.
    pub fn len(&self) -> GenerationRepositoryResult<usize> {
        let state = self.state.read().map_err(|err| {
            GenerationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.generations.len())
    }

    /// Returns whether no generation is stored.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the lock is poisoned.
    pub fn is_empty(&self) -> GenerationRepositoryResult<bool> {
        self.len().map(|count| count == 0)
    }
}

#[async_trait]
impl GenerationRepository for InMemoryGenerationRepository {
    async fn store(&self, generation: &Generation) -> GenerationRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            GenerationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.generations.contains_key(&generation.id()) {
            return Err(GenerationRepositoryError::DuplicateGeneration(
                generation.id(),
            ));
        }

        state
            .owner_index
            .entry(generation.owner_id())
            .or_default()
            .push(generation.id());
        state
            .generations
            .insert(generation.id(), generation.clone());
        Ok(())
    }

    async fn update(&self, generation: &Generation) -> GenerationRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            GenerationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let stored = state
            .generations
            .get_mut(&generation.id())
            .ok_or(GenerationRepositoryError::NotFound(generation.id()))?;
        if stored.status() != GenerationStatus::Pending {
            return Err(GenerationRepositoryError::AlreadyFinalised(generation.id()));
        }

        // Identity, owner, code, and language keep their stored values.
        let mut data = stored.to_persisted();
        data.status = generation.status();
        data.generated_tests = generation.generated_tests().map(str::to_owned);
        data.updated_at = generation.updated_at();
        *stored = Generation::from_persisted(data);
        Ok(())
    }

    async fn find_by_id(&self, id: GenerationId) -> GenerationRepositoryResult<Option<Generation>> {
        let state = self.state.read().map_err(|err| {
            GenerationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.generations.get(&id).cloned())
    }

    async fn find_by_owner(
        &self,
        owner_id: OwnerId,
    ) -> GenerationRepositoryResult<Vec<Generation>> {
        let state = self.state.read().map_err(|err| {
            GenerationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut generations: Vec<Generation> = state
            .owner_index
            .get(&owner_id)
            .map(|ids| {
                ids.iter()
                    .rev()
                    .filter_map(|id| state.generations.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        // Stable sort keeps later insertions first among equal timestamps.
        generations.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(generations)
    }
}

//! Port contracts for the test-generation pipeline.
//!
//! Ports define infrastructure-agnostic interfaces used by generation
//! services.

pub mod provider;
pub mod repository;

pub use provider::{ProviderError, ProviderResult, TestGenerationProvider};
pub use repository::{GenerationRepository, GenerationRepositoryError, GenerationRepositoryResult};

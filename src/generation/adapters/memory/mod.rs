//! In-memory adapters for generation persistence.

mod generation;

pub use generation::InMemoryGenerationRepository;

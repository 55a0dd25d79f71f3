//! Service layer for test-generation requests.

mod pipeline;

pub use pipeline::{
    CreateGenerationRequest, GenerationService, GenerationServiceError, GenerationServiceResult,
};

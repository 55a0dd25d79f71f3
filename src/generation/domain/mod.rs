//! Domain model for test-generation requests.
//!
//! The domain covers submission validation, prompt construction, response
//! normalization, and the generation status lifecycle. Persistence and
//! provider transport stay outside the domain boundary.

mod error;
mod generation;
mod ids;
mod language;
mod normalize;
mod prompt;
mod validation;

pub use error::{GenerationDomainError, ParseGenerationStatusError, ValidationError};
pub use generation::{Generation, GenerationStatus, PersistedGenerationData};
pub use ids::{GenerationId, OwnerId};
pub use language::LanguageLabel;
pub use normalize::normalize_response;
pub use prompt::{PromptBuilder, PromptError};
pub use validation::{MAX_CODE_LENGTH, MAX_LANGUAGE_LENGTH, validate_submission};

//! Adapter implementations for the generation ports.

pub mod chat_completions;
pub mod memory;
pub mod postgres;
pub mod scripted;

use crate::config::{ConfigurationError, ProviderSettings};
use crate::generation::ports::TestGenerationProvider;
use std::sync::Arc;

/// Builds the provider adapter selected by `settings`.
///
/// This is the only place the configured backend is inspected; callers hold
/// the returned trait object.
///
/// # Errors
///
/// Returns [`ConfigurationError`] when the adapter cannot be constructed.
pub fn provider_for(
    settings: &ProviderSettings,
) -> Result<Arc<dyn TestGenerationProvider>, ConfigurationError> {
    let provider = chat_completions::ChatCompletionsProvider::new(settings.clone())?;
    Ok(Arc::new(provider))
}

//! Provider port for language-model backends that write unit tests.

use crate::generation::domain::PromptError;
use async_trait::async_trait;
use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Backend capable of turning submitted code into unit tests.
///
/// One implementation exists per backend; the active one is chosen once at
/// startup and injected into the generation service.
#[async_trait]
pub trait TestGenerationProvider: Send + Sync {
    /// Returns the stable backend name used in logs.
    fn name(&self) -> &'static str;

    /// Requests unit tests for `code` written in `language`.
    ///
    /// The caller has already validated both values. On success the trimmed
    /// text of the first completion choice is returned as-is, fences
    /// included.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Upstream`] when the backend call fails,
    /// [`ProviderError::EmptyResponse`] when it succeeds without usable
    /// content, and [`ProviderError::Configuration`] when the adapter cannot
    /// serve requests at all.
    async fn generate_unit_tests(&self, code: &str, language: &str) -> ProviderResult<String>;
}

/// Errors returned by provider adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The adapter is misconfigured.
    #[error("provider is not configured: {0}")]
    Configuration(String),

    /// The system instruction could not be rendered.
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// The backend call failed or returned a non-success result.
    #[error("AI test generation failed: {0}")]
    Upstream(String),

    /// The backend succeeded but returned no usable content.
    #[error("AI returned an empty response")]
    EmptyResponse,
}

impl ProviderError {
    /// Wraps a backend failure message.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Returns whether this error belongs to the upstream category.
    ///
    /// [`ProviderError::EmptyResponse`] is an upstream failure.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::EmptyResponse)
    }
}

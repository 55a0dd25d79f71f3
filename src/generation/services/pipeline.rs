//! Orchestration of a single generation request from submission to outcome.

use crate::generation::{
    domain::{
        Generation, GenerationDomainError, GenerationId, LanguageLabel, OwnerId,
        ValidationError, normalize_response, validate_submission,
    },
    ports::{GenerationRepository, GenerationRepositoryError, ProviderError, TestGenerationProvider},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Message surfaced when the provider task ends without a usable outcome.
const GENERIC_FAILURE: &str = "test generation failed. Please try again later";

/// Request payload for generating tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGenerationRequest {
    code: String,
    language: String,
}

impl CreateGenerationRequest {
    /// Creates a request from submitted code and a language label.
    #[must_use]
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
        }
    }

    /// Returns the submitted code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the language label as submitted.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }
}

/// Service-level errors for generation operations.
#[derive(Debug, Error)]
pub enum GenerationServiceError {
    /// The submission was rejected; no record was created.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The provider cannot serve requests in this deployment.
    #[error("service unavailable: {0}")]
    Configuration(String),

    /// The provider failed or returned unusable output.
    #[error(transparent)]
    Upstream(ProviderError),

    /// The generation does not exist or belongs to another owner.
    #[error("generation {0} not found")]
    NotFound(GenerationId),

    /// The aggregate rejected a lifecycle change.
    #[error(transparent)]
    Domain(#[from] GenerationDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] GenerationRepositoryError),
}

impl GenerationServiceError {
    /// Returns the HTTP status code a caller-facing boundary should use.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Configuration(_) | Self::Upstream(_) => 503,
            Self::Domain(_) | Self::Repository(_) => 500,
        }
    }

    fn generic_upstream() -> Self {
        Self::Upstream(ProviderError::upstream(GENERIC_FAILURE))
    }
}

impl From<ProviderError> for GenerationServiceError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Configuration(message) => Self::Configuration(message),
            ProviderError::Prompt(prompt_error) => Self::Configuration(prompt_error.to_string()),
            upstream @ (ProviderError::Upstream(_) | ProviderError::EmptyResponse) => {
                Self::Upstream(upstream)
            }
        }
    }
}

/// Result type for generation service operations.
pub type GenerationServiceResult<T> = Result<T, GenerationServiceError>;

/// Generation pipeline orchestration service.
///
/// Each [`GenerationService::create`] call is independent. The provider
/// round-trip and the terminal status write run on a detached task, so a
/// caller that stops waiting does not cancel the provider call and the
/// outcome is still persisted.
pub struct GenerationService<R, P, C>
where
    R: GenerationRepository + 'static,
    P: TestGenerationProvider + ?Sized + 'static,
    C: Clock + Send + Sync + 'static,
{
    repository: Arc<R>,
    provider: Arc<P>,
    clock: Arc<C>,
}

impl<R, P, C> Clone for GenerationService<R, P, C>
where
    R: GenerationRepository + 'static,
    P: TestGenerationProvider + ?Sized + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            provider: Arc::clone(&self.provider),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, P, C> GenerationService<R, P, C>
where
    R: GenerationRepository + 'static,
    P: TestGenerationProvider + ?Sized + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new generation service.
    #[must_use]
    pub const fn new(repository: Arc<R>, provider: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            repository,
            provider,
            clock,
        }
    }

    /// Runs a generation request to its terminal outcome.
    ///
    /// The submission is validated before anything is stored. A pending
    /// record is then created and the provider is called with the code and
    /// language exactly as submitted. On success the normalized reply is
    /// stored and the completed record returned. On failure, including a
    /// failed write of the completed record, the record is marked failed
    /// before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationServiceError::Validation`] for rejected input,
    /// [`GenerationServiceError::Configuration`] or
    /// [`GenerationServiceError::Upstream`] when the provider fails, and
    /// [`GenerationServiceError::Repository`] when persistence fails.
    pub async fn create(
        &self,
        owner_id: OwnerId,
        request: CreateGenerationRequest,
    ) -> GenerationServiceResult<Generation> {
        validate_submission(&request.code, &request.language)?;
        let language = LanguageLabel::new(&request.language)?;

        let generation =
            Generation::new_pending(owner_id, request.code.as_str(), language, &*self.clock);
        self.repository.store(&generation).await?;
        info!(
            generation_id = %generation.id(),
            owner_id = %owner_id,
            language = %generation.language(),
            provider = self.provider.name(),
            "generation requested"
        );

        let job = GenerationJob {
            service: self.clone(),
            generation,
            request,
        };
        tokio::spawn(job.run())
            .await
            .map_err(|err| {
                error!(error = %err, "generation task ended abnormally");
                GenerationServiceError::generic_upstream()
            })?
    }

    /// Returns every generation owned by `owner_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationServiceError::Repository`] when lookup fails.
    pub async fn find_all_by_owner(
        &self,
        owner_id: OwnerId,
    ) -> GenerationServiceResult<Vec<Generation>> {
        Ok(self.repository.find_by_owner(owner_id).await?)
    }

    /// Returns a generation owned by `owner_id`.
    ///
    /// A generation owned by someone else is reported exactly like a missing
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationServiceError::NotFound`] when the generation is
    /// missing or not owned by `owner_id`, and
    /// [`GenerationServiceError::Repository`] when lookup fails.
    pub async fn find_one(
        &self,
        id: GenerationId,
        owner_id: OwnerId,
    ) -> GenerationServiceResult<Generation> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|generation| generation.is_owned_by(owner_id))
            .ok_or(GenerationServiceError::NotFound(id))
    }
}

/// Provider round-trip and terminal status write for one pending record.
struct GenerationJob<R, P, C>
where
    R: GenerationRepository + 'static,
    P: TestGenerationProvider + ?Sized + 'static,
    C: Clock + Send + Sync + 'static,
{
    service: GenerationService<R, P, C>,
    generation: Generation,
    request: CreateGenerationRequest,
}

impl<R, P, C> GenerationJob<R, P, C>
where
    R: GenerationRepository + 'static,
    P: TestGenerationProvider + ?Sized + 'static,
    C: Clock + Send + Sync + 'static,
{
    async fn run(self) -> GenerationServiceResult<Generation> {
        let Self {
            service,
            generation,
            request,
        } = self;

        let provider = Arc::clone(&service.provider);
        let CreateGenerationRequest { code, language } = request;
        // A panicking adapter surfaces here as a join error.
        let outcome =
            tokio::spawn(async move { provider.generate_unit_tests(&code, &language).await })
                .await;

        match outcome {
            Ok(Ok(raw)) => {
                let tests = normalize_response(&raw);
                if tests.is_empty() {
                    return service
                        .record_failure(generation, ProviderError::EmptyResponse.into())
                        .await;
                }
                service.record_success(generation, tests).await
            }
            Ok(Err(provider_error)) => service.record_failure(generation, provider_error.into()).await,
            Err(join_error) => {
                error!(error = %join_error, "provider task ended abnormally");
                service
                    .record_failure(generation, GenerationServiceError::generic_upstream())
                    .await
            }
        }
    }
}

impl<R, P, C> GenerationService<R, P, C>
where
    R: GenerationRepository + 'static,
    P: TestGenerationProvider + ?Sized + 'static,
    C: Clock + Send + Sync + 'static,
{
    async fn record_success(
        &self,
        generation: Generation,
        tests: String,
    ) -> GenerationServiceResult<Generation> {
        let pending = generation.clone();
        let mut completed = generation;
        completed.complete(tests, &*self.clock)?;
        if let Err(err) = self.repository.update(&completed).await {
            error!(
                generation_id = %completed.id(),
                error = %err,
                "failed to record generated tests"
            );
            // The stored record is still pending; fall through to the failed write.
            return self
                .record_failure(pending, GenerationServiceError::generic_upstream())
                .await;
        }
        info!(
            generation_id = %completed.id(),
            status = %completed.status(),
            "generation finished"
        );
        Ok(completed)
    }

    async fn record_failure(
        &self,
        mut generation: Generation,
        cause: GenerationServiceError,
    ) -> GenerationServiceResult<Generation> {
        generation.fail(&*self.clock)?;
        if let Err(err) = self.repository.update(&generation).await {
            error!(
                generation_id = %generation.id(),
                error = %err,
                cause = %cause,
                "failed to record generation failure"
            );
            return Err(err.into());
        }
        warn!(
            generation_id = %generation.id(),
            status = %generation.status(),
            error = %cause,
            "generation failed"
        );
        Err(cause)
    }
}

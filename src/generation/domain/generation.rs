//! Generation aggregate root and status lifecycle.

use super::{
    GenerationDomainError, GenerationId, LanguageLabel, OwnerId, ParseGenerationStatusError,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    /// The provider has not answered yet.
    Pending,
    /// Tests were generated and stored.
    Completed,
    /// The provider call failed.
    Failed,
}

impl GenerationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns whether transition to `target` is allowed.
    ///
    /// Only `pending` may move, and only to a terminal status.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Completed | Self::Failed)
        )
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for GenerationStatus {
    type Error = ParseGenerationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseGenerationStatusError(value.to_owned())),
        }
    }
}

/// Generation aggregate root.
///
/// Identity, ownership, submitted code, and language are fixed at creation.
/// Generated tests are present exactly when the status is `completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    id: GenerationId,
    owner_id: OwnerId,
    input_code: String,
    language: LanguageLabel,
    status: GenerationStatus,
    generated_tests: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedGenerationData {
    /// Persisted generation identifier.
    pub id: GenerationId,
    /// Persisted owner identifier.
    pub owner_id: OwnerId,
    /// Persisted submitted code.
    pub input_code: String,
    /// Persisted normalized language label.
    pub language: LanguageLabel,
    /// Persisted lifecycle status.
    pub status: GenerationStatus,
    /// Persisted generated tests, if any.
    pub generated_tests: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest transition timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Generation {
    /// Creates a pending generation for a validated submission.
    #[must_use]
    pub fn new_pending(
        owner_id: OwnerId,
        input_code: impl Into<String>,
        language: LanguageLabel,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: GenerationId::new(),
            owner_id,
            input_code: input_code.into(),
            language,
            status: GenerationStatus::Pending,
            generated_tests: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a generation from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedGenerationData) -> Self {
        Self {
            id: data.id,
            owner_id: data.owner_id,
            input_code: data.input_code,
            language: data.language,
            status: data.status,
            generated_tests: data.generated_tests,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns a persistence snapshot of this generation.
    #[must_use]
    pub fn to_persisted(&self) -> PersistedGenerationData {
        PersistedGenerationData {
            id: self.id,
            owner_id: self.owner_id,
            input_code: self.input_code.clone(),
            language: self.language.clone(),
            status: self.status,
            generated_tests: self.generated_tests.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Returns the generation identifier.
    #[must_use]
    pub const fn id(&self) -> GenerationId {
        self.id
    }

    /// Returns the owner identifier.
    #[must_use]
    pub const fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    /// Returns whether the generation belongs to `owner_id`.
    #[must_use]
    pub fn is_owned_by(&self, owner_id: OwnerId) -> bool {
        self.owner_id == owner_id
    }

    /// Returns the submitted code.
    #[must_use]
    pub fn input_code(&self) -> &str {
        &self.input_code
    }

    /// Returns the normalized language label.
    #[must_use]
    pub const fn language(&self) -> &LanguageLabel {
        &self.language
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> GenerationStatus {
        self.status
    }

    /// Returns the generated tests when the generation completed.
    #[must_use]
    pub fn generated_tests(&self) -> Option<&str> {
        self.generated_tests.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest transition timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the generation completed with the given tests.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationDomainError::EmptyGeneratedTests`] when `tests` is
    /// blank, or [`GenerationDomainError::InvalidStatusTransition`] when the
    /// generation is no longer pending.
    pub fn complete(
        &mut self,
        tests: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), GenerationDomainError> {
        let tests = tests.into();
        if tests.trim().is_empty() {
            return Err(GenerationDomainError::EmptyGeneratedTests);
        }
        self.transition_to(GenerationStatus::Completed)?;
        self.generated_tests = Some(tests);
        self.touch(clock);
        Ok(())
    }

    /// Marks the generation failed.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationDomainError::InvalidStatusTransition`] when the
    /// generation is no longer pending.
    pub fn fail(&mut self, clock: &impl Clock) -> Result<(), GenerationDomainError> {
        self.transition_to(GenerationStatus::Failed)?;
        self.generated_tests = None;
        self.touch(clock);
        Ok(())
    }

    fn transition_to(&mut self, target: GenerationStatus) -> Result<(), GenerationDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(GenerationDomainError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

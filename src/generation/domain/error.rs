//! Error types for generation domain validation and parsing.

use super::GenerationStatus;
use thiserror::Error;

/// Reasons a submission is rejected before any record is created.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The code is empty or whitespace only.
    #[error("code cannot be blank")]
    BlankCode,

    /// The trimmed code exceeds the accepted size.
    #[error("code must not exceed {limit} characters (got {length})")]
    CodeTooLong {
        /// Maximum accepted character count.
        limit: usize,
        /// Character count of the trimmed submission.
        length: usize,
    },

    /// The language label is empty or whitespace only.
    #[error("language cannot be blank")]
    BlankLanguage,

    /// The language label exceeds the accepted size.
    #[error("language must not exceed {limit} characters (got {length})")]
    LanguageTooLong {
        /// Maximum accepted character count.
        limit: usize,
        /// Character count of the submitted label.
        length: usize,
    },
}

/// Errors raised by the generation aggregate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationDomainError {
    /// The requested status change is not part of the lifecycle.
    #[error("invalid generation status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: GenerationStatus,
        /// Requested status.
        to: GenerationStatus,
    },

    /// A completed generation must carry non-empty tests.
    #[error("generated tests must not be empty")]
    EmptyGeneratedTests,
}

/// Error returned while parsing generation statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown generation status: {0}")]
pub struct ParseGenerationStatusError(pub String);

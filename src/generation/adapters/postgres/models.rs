//! Diesel row models for generation persistence.

use super::schema::generations;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for generation records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = generations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GenerationRow {
    /// Generation identifier.
    pub id: uuid::Uuid,
    /// Requesting principal.
    pub owner_id: uuid::Uuid,
    /// Submitted source code.
    pub input_code: String,
    /// Normalized language label.
    pub language: String,
    /// Lifecycle status.
    pub status: String,
    /// Generated tests, if any.
    pub generated_tests: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status transition timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for generation records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = generations)]
pub struct NewGenerationRow {
    /// Generation identifier.
    pub id: uuid::Uuid,
    /// Requesting principal.
    pub owner_id: uuid::Uuid,
    /// Submitted source code.
    pub input_code: String,
    /// Normalized language label.
    pub language: String,
    /// Lifecycle status.
    pub status: String,
    /// Generated tests, if any.
    pub generated_tests: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status transition timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset written when a generation reaches a terminal status.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = generations)]
#[diesel(treat_none_as_null = true)]
pub struct GenerationOutcomeChangeset {
    /// Terminal status.
    pub status: String,
    /// Generated tests, cleared on failure.
    pub generated_tests: Option<String>,
    /// Transition timestamp.
    pub updated_at: DateTime<Utc>,
}

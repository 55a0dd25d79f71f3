//! `PostgreSQL` adapters for generation persistence.

pub(crate) mod models;
mod repository;
mod schema;

pub use repository::{GenerationPgPool, PostgresGenerationRepository};
#[cfg(test)]
pub(crate) use repository::{row_to_generation, to_new_row};

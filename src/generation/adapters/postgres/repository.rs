//! `PostgreSQL` repository implementation for generation storage.

use super::{
    models::{GenerationOutcomeChangeset, GenerationRow, NewGenerationRow},
    schema::generations,
};
use crate::generation::{
    domain::{
        Generation, GenerationId, GenerationStatus, LanguageLabel, OwnerId,
        PersistedGenerationData,
    },
    ports::{GenerationRepository, GenerationRepositoryError, GenerationRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by generation adapters.
pub type GenerationPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed generation repository.
#[derive(Debug, Clone)]
pub struct PostgresGenerationRepository {
    pool: GenerationPgPool,
}

impl PostgresGenerationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: GenerationPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> GenerationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> GenerationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(GenerationRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(GenerationRepositoryError::persistence)?
    }
}

#[async_trait]
impl GenerationRepository for PostgresGenerationRepository {
    async fn store(&self, generation: &Generation) -> GenerationRepositoryResult<()> {
        let generation_id = generation.id();
        let new_row = to_new_row(generation);

        self.run_blocking(move |connection| {
            diesel::insert_into(generations::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        GenerationRepositoryError::DuplicateGeneration(generation_id)
                    }
                    _ => GenerationRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, generation: &Generation) -> GenerationRepositoryResult<()> {
        let generation_id = generation.id();
        let changeset = GenerationOutcomeChangeset {
            status: generation.status().as_str().to_owned(),
            generated_tests: generation.generated_tests().map(str::to_owned),
            updated_at: generation.updated_at(),
        };

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                generations::table
                    .filter(generations::id.eq(generation_id.into_inner()))
                    .filter(generations::status.eq(GenerationStatus::Pending.as_str())),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(GenerationRepositoryError::persistence)?;
            if updated > 0 {
                return Ok(());
            }

            let exists = diesel::select(diesel::dsl::exists(
                generations::table.filter(generations::id.eq(generation_id.into_inner())),
            ))
            .get_result::<bool>(connection)
            .map_err(GenerationRepositoryError::persistence)?;
            if exists {
                Err(GenerationRepositoryError::AlreadyFinalised(generation_id))
            } else {
                Err(GenerationRepositoryError::NotFound(generation_id))
            }
        })
        .await
    }

    async fn find_by_id(&self, id: GenerationId) -> GenerationRepositoryResult<Option<Generation>> {
        self.run_blocking(move |connection| {
            let row = generations::table
                .filter(generations::id.eq(id.into_inner()))
                .select(GenerationRow::as_select())
                .first::<GenerationRow>(connection)
                .optional()
                .map_err(GenerationRepositoryError::persistence)?;
            row.map(row_to_generation).transpose()
        })
        .await
    }

    async fn find_by_owner(
        &self,
        owner_id: OwnerId,
    ) -> GenerationRepositoryResult<Vec<Generation>> {
        self.run_blocking(move |connection| {
            let rows = generations::table
                .filter(generations::owner_id.eq(owner_id.into_inner()))
                .order((generations::created_at.desc(), generations::id.desc()))
                .select(GenerationRow::as_select())
                .load::<GenerationRow>(connection)
                .map_err(GenerationRepositoryError::persistence)?;
            rows.into_iter().map(row_to_generation).collect()
        })
        .await
    }
}

/// Maps a generation to its insert row.
pub(crate) fn to_new_row(generation: &Generation) -> NewGenerationRow {
    NewGenerationRow {
        id: generation.id().into_inner(),
        owner_id: generation.owner_id().into_inner(),
        input_code: generation.input_code().to_owned(),
        language: generation.language().as_str().to_owned(),
        status: generation.status().as_str().to_owned(),
        generated_tests: generation.generated_tests().map(str::to_owned),
        created_at: generation.created_at(),
        updated_at: generation.updated_at(),
    }
}

/// Rebuilds a generation from a stored row.
pub(crate) fn row_to_generation(row: GenerationRow) -> GenerationRepositoryResult<Generation> {
    let GenerationRow {
        id,
        owner_id,
        input_code,
        language: persisted_language,
        status: persisted_status,
        generated_tests,
        created_at,
        updated_at,
    } = row;

    let language = LanguageLabel::new(&persisted_language)
        .map_err(GenerationRepositoryError::persistence)?;
    let status = GenerationStatus::try_from(persisted_status.as_str())
        .map_err(GenerationRepositoryError::persistence)?;

    let data = PersistedGenerationData {
        id: GenerationId::from_uuid(id),
        owner_id: OwnerId::from_uuid(owner_id),
        input_code,
        language,
        status,
        generated_tests,
        created_at,
        updated_at,
    };
    Ok(Generation::from_persisted(data))
}

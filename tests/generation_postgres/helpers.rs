//! Shared helpers for `PostgreSQL` generation repository tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use pg_embedded_setup_unpriv::TestCluster;
use testsmith::generation::adapters::postgres::PostgresGenerationRepository;
use tokio::runtime::Runtime;

/// Boxed error type for test setup.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SQL to create the generations table.
pub const CREATE_GENERATIONS_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_generations/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "testsmith_test_template";

/// Creates a tokio runtime for driving the async repository from sync tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Box::new(err) as BoxError)
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|err| eyre::eyre!("{err}"))?;
            conn.batch_execute(CREATE_GENERATIONS_SQL)
                .map_err(|err| eyre::eyre!("migration failed: {err}"))?;
            Ok(())
        })
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok(())
}

/// A database cloned from the template, dropped when the guard goes out of
/// scope.
pub struct TestDatabase {
    cluster: &'static TestCluster,
    name: String,
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(self.name.as_str()));
    }
}

/// Creates a fresh database from the template and a repository bound to it.
///
/// # Errors
///
/// Returns an error if template setup, database creation, or pool setup fails.
pub fn setup_repository(
    cluster: &'static TestCluster,
    prefix: &str,
) -> Result<(TestDatabase, PostgresGenerationRepository), BoxError> {
    ensure_template(cluster)?;
    let name = format!("{prefix}_{}", uuid::Uuid::new_v4().simple());
    cluster
        .create_database_from_template(name.as_str(), TEMPLATE_DB)
        .map_err(|err| Box::new(err) as BoxError)?;
    let database = TestDatabase { cluster, name };

    let url = cluster.connection().database_url(&database.name);
    let pool = Pool::builder()
        .max_size(2)
        .build(ConnectionManager::<PgConnection>::new(url))
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok((database, PostgresGenerationRepository::new(pool)))
}

//! Command-line entry point for unit-test generation.
//!
//! ```text
//! testsmith generate --language python src/calc.py
//! testsmith generate --language rust --offline --json src/lib.rs
//! testsmith list --owner 6f1c2d4e-1111-4a5b-9c8d-0123456789ab
//! ```
//!
//! Provider settings come from the environment (`AI_PROVIDER`,
//! `DEEPSEEK_API_KEY`, ...). When `DATABASE_URL` is set, requests are
//! persisted to `PostgreSQL`; otherwise an in-memory store is used.

use clap::{Parser, Subcommand};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use testsmith::config::{ConfigurationError, ProviderSettings};
use testsmith::generation::{
    adapters::{
        memory::InMemoryGenerationRepository,
        postgres::{GenerationPgPool, PostgresGenerationRepository},
        provider_for,
        scripted::ScriptedProvider,
    },
    domain::{Generation, OwnerId},
    ports::{GenerationRepository, TestGenerationProvider},
    services::{CreateGenerationRequest, GenerationService, GenerationServiceError},
};
use testsmith::telemetry::{LogFormat, init_tracing};
use thiserror::Error;
use tracing::debug;

const DATABASE_URL_ENV: &str = "DATABASE_URL";

const OFFLINE_REPLY: &str = "// offline mode: no provider was contacted";

#[derive(Debug, Parser)]
#[command(name = "testsmith", version, about = "Generate unit tests with a language model")]
struct Cli {
    /// Enable debug logging.
    #[arg(long, global = true)]
    verbose: bool,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate unit tests for a source file.
    Generate {
        /// Target language label, e.g. `python` or `TypeScript`.
        #[arg(short, long)]
        language: String,

        /// Owner recorded on the request; random when omitted.
        #[arg(long)]
        owner: Option<OwnerId>,

        /// Use a canned provider reply instead of calling a backend.
        #[arg(long)]
        offline: bool,

        /// Print the full record as JSON instead of the tests alone.
        #[arg(long)]
        json: bool,

        /// Source file to generate tests for.
        file: PathBuf,
    },
    /// List stored generations for an owner, newest first.
    List {
        /// Owner whose generations are listed.
        #[arg(long)]
        owner: OwnerId,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Service(#[from] GenerationServiceError),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("DATABASE_URL must be set to list stored generations")]
    MissingDatabase,
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Service(GenerationServiceError::Validation(_)) => ExitCode::from(2),
            Self::Configuration(_) => ExitCode::from(3),
            Self::Service(err) if err.status_code() == 503 => ExitCode::from(3),
            _ => ExitCode::FAILURE,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    // A subscriber can only be missing here if one was installed already.
    drop(init_tracing(cli.verbose, format));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            drop(writeln!(io::stderr(), "error: {err}"));
            err.exit_code()
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let pool = database_pool()?;

    match cli.command {
        Command::Generate {
            language,
            owner,
            offline,
            json,
            file,
        } => {
            let code = std::fs::read_to_string(&file).map_err(|source| CliError::ReadSource {
                path: file.clone(),
                source,
            })?;
            // Settings are resolved before any request is accepted.
            let provider: Arc<dyn TestGenerationProvider> = if offline {
                Arc::new(ScriptedProvider::answering(OFFLINE_REPLY))
            } else {
                provider_for(&ProviderSettings::from_env()?)?
            };
            let owner_id = owner.unwrap_or_default();
            let request = CreateGenerationRequest::new(code, language);
            let generation = match pool {
                Some(pool) => runtime.block_on(generate(
                    Arc::new(PostgresGenerationRepository::new(pool)),
                    provider,
                    owner_id,
                    request,
                ))?,
                None => runtime.block_on(generate(
                    Arc::new(InMemoryGenerationRepository::new()),
                    provider,
                    owner_id,
                    request,
                ))?,
            };
            print_generation(&generation, json)
        }
        Command::List { owner } => {
            let pool = pool.ok_or(CliError::MissingDatabase)?;
            let repository = Arc::new(PostgresGenerationRepository::new(pool));
            let service = GenerationService::new(
                repository,
                Arc::new(ScriptedProvider::answering(OFFLINE_REPLY)),
                Arc::new(DefaultClock),
            );
            let generations = runtime.block_on(service.find_all_by_owner(owner))?;
            print_listing(&generations)
        }
    }
}

fn database_pool() -> Result<Option<GenerationPgPool>, CliError> {
    let Some(url) = std::env::var(DATABASE_URL_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
    else {
        debug!("no database configured, using in-memory store");
        return Ok(None);
    };
    Pool::builder()
        .build(ConnectionManager::<PgConnection>::new(url))
        .map(Some)
        .map_err(|err| CliError::Database(err.to_string()))
}

async fn generate<R>(
    repository: Arc<R>,
    provider: Arc<dyn TestGenerationProvider>,
    owner_id: OwnerId,
    request: CreateGenerationRequest,
) -> Result<Generation, CliError>
where
    R: GenerationRepository + 'static,
{
    let service = GenerationService::new(repository, provider, Arc::new(DefaultClock));
    Ok(service.create(owner_id, request).await?)
}

fn print_generation(generation: &Generation, json: bool) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, generation)?;
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "{}", generation.generated_tests().unwrap_or_default())?;
    }
    Ok(())
}

fn print_listing(generations: &[Generation]) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    for generation in generations {
        writeln!(
            stdout,
            "{}\t{}\t{}\t{}",
            generation.id(),
            generation.created_at().to_rfc3339(),
            generation.language(),
            generation.status()
        )?;
    }
    Ok(())
}

//! Testsmith: unit-test generation backed by language-model providers.
//!
//! The crate accepts source code and a target language, asks a configured
//! provider backend for runnable unit tests, and persists each request with
//! its outcome.
//!
//! # Architecture
//!
//! Testsmith follows hexagonal architecture principles:
//!
//! - **Domain**: Validation, prompt construction, response normalization,
//!   and the generation status lifecycle
//! - **Ports**: Abstract trait interfaces for storage and provider backends
//! - **Adapters**: Concrete implementations of ports (`PostgreSQL`, HTTP
//!   chat completions, in-memory)
//!
//! # Modules
//!
//! - [`generation`]: The test-generation request pipeline
//! - [`config`]: Provider settings loaded once at startup
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod generation;
pub mod telemetry;

//! Test-generation request pipeline.
//!
//! A generation request carries submitted source code and a target language
//! label. The pipeline validates the submission, records a pending request,
//! asks the configured provider backend for unit tests, strips any enclosing
//! code fence from the reply, and persists exactly one terminal outcome:
//! `completed` with the generated tests or `failed` without them. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

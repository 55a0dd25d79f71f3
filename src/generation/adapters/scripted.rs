//! Deterministic provider adapter for tests and offline runs.

use crate::generation::ports::{ProviderError, ProviderResult, TestGenerationProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A recorded provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedCall {
    /// Code passed to the provider.
    pub code: String,
    /// Language label passed to the provider.
    pub language: String,
}

/// Provider that replays queued outcomes without network access.
///
/// Queued outcomes are consumed in order. Once the queue is empty the
/// fallback outcome is returned for every call.
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    state: Arc<Mutex<ScriptedState>>,
}

#[derive(Debug)]
struct ScriptedState {
    queued: VecDeque<ProviderResult<String>>,
    fallback: ProviderResult<String>,
    calls: Vec<ScriptedCall>,
}

impl ScriptedProvider {
    /// Creates a provider that always answers with `text`.
    #[must_use]
    pub fn answering(text: impl Into<String>) -> Self {
        Self::with_fallback(Ok(text.into()))
    }

    /// Creates a provider that always fails with `error`.
    #[must_use]
    pub fn failing(error: ProviderError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: ProviderResult<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptedState {
                queued: VecDeque::new(),
                fallback,
                calls: Vec::new(),
            })),
        }
    }

    /// Queues an outcome ahead of the fallback.
    #[must_use]
    pub fn then(self, outcome: ProviderResult<String>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.queued.push_back(outcome);
        }
        self
    }

    /// Returns every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<ScriptedCall> {
        self.state
            .lock()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TestGenerationProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate_unit_tests(&self, code: &str, language: &str) -> ProviderResult<String> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| ProviderError::upstream(err.to_string()))?;
        state.calls.push(ScriptedCall {
            code: code.to_owned(),
            language: language.to_owned(),
        });
        match state.queued.pop_front() {
            Some(outcome) => outcome,
            None => state.fallback.clone(),
        }
    }
}

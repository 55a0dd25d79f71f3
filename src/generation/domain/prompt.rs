//! System instruction construction for provider backends.

use minijinja::{Environment, context};
use thiserror::Error;

const TEMPLATE_NAME: &str = "unit_test_system_prompt";

const TEMPLATE: &str = "\
You are a senior developer writing unit tests. Reply with ONLY executable test code: no explanations, no markdown headings, no commentary.
Requirements:
1. Produce runnable unit tests that execute as-is, including any imports and setup they need.
2. Cover normal cases, edge cases (empty input, boundaries, null or absent values where applicable), and at least one error or invalid-input case where relevant.
3. Use the idiomatic test framework for the target language (for example Jest or Vitest for JavaScript and TypeScript, pytest for Python, JUnit for Java, the built-in test harness for Rust).
4. Assume the code under test lives in the same project. Match the style and conventions of the language: {{ language }}.
5. Output only the test code. Do not wrap it in a markdown code block unless the submitted code was already fenced.";

/// Errors raised while rendering the system instruction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render system prompt: {0}")]
pub struct PromptError(pub String);

impl From<minijinja::Error> for PromptError {
    fn from(err: minijinja::Error) -> Self {
        Self(err.to_string())
    }
}

/// Renders the deterministic system instruction sent ahead of submitted code.
///
/// The template is compiled once; rendering the same language label always
/// yields the same text.
#[derive(Debug)]
pub struct PromptBuilder {
    environment: Environment<'static>,
}

impl PromptBuilder {
    /// Compiles the system instruction template.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError`] when the template fails to compile.
    pub fn new() -> Result<Self, PromptError> {
        let mut environment = Environment::new();
        environment.add_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { environment })
    }

    /// Builds the instruction for a language label.
    ///
    /// The label is trimmed and lower-cased before interpolation.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError`] when rendering fails.
    pub fn build(&self, language: &str) -> Result<String, PromptError> {
        let language = language.trim().to_lowercase();
        let template = self.environment.get_template(TEMPLATE_NAME)?;
        Ok(template.render(context! { language })?)
    }
}

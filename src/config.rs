//! Process-wide provider configuration.
//!
//! Settings are read once at startup into an immutable [`ProviderSettings`]
//! value and injected into the provider adapter. A missing credential or an
//! unknown provider name is a fatal [`ConfigurationError`].

use std::fmt;
use thiserror::Error;

/// Environment variable selecting the provider backend.
pub const PROVIDER_ENV: &str = "AI_PROVIDER";

/// Default completion token ceiling.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Upper bound accepted for the sampling temperature.
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Errors raised while loading provider configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The provider selector names an unsupported backend.
    #[error("unsupported AI_PROVIDER \"{0}\"; expected \"deepseek\" or \"openai\"")]
    UnsupportedProvider(String),

    /// The selected backend has no credential.
    #[error("{variable} is required when AI_PROVIDER={provider}")]
    MissingCredential {
        /// Selected provider name.
        provider: &'static str,
        /// Environment variable expected to hold the credential.
        variable: &'static str,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Supported provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// `DeepSeek` chat completions.
    DeepSeek,
    /// `OpenAI` chat completions.
    OpenAi,
}

impl ProviderKind {
    /// Returns the canonical provider name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek",
            Self::OpenAi => "openai",
        }
    }

    /// Returns the environment variable prefix for backend settings.
    #[must_use]
    pub const fn env_prefix(self) -> &'static str {
        match self {
            Self::DeepSeek => "DEEPSEEK",
            Self::OpenAi => "OPENAI",
        }
    }

    /// Returns the environment variable holding the API credential.
    #[must_use]
    pub const fn api_key_env(self) -> &'static str {
        match self {
            Self::DeepSeek => "DEEPSEEK_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Returns the default API base URL.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::DeepSeek => "https://api.deepseek.com/v1",
            Self::OpenAi => "https://api.openai.com/v1",
        }
    }

    /// Returns the default completion model.
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek-coder",
            Self::OpenAi => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderKind {
    type Error = ConfigurationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "deepseek" => Ok(Self::DeepSeek),
            "openai" => Ok(Self::OpenAi),
            _ => Err(ConfigurationError::UnsupportedProvider(normalized)),
        }
    }
}

/// Provider API credential. Its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a credential, trimming surrounding whitespace.
    ///
    /// Returns `None` when the value is blank.
    #[must_use]
    pub fn new(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Returns the raw credential for request signing.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Immutable settings for the active provider backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    kind: ProviderKind,
    api_key: ApiKey,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ProviderSettings {
    /// Creates settings with backend defaults.
    #[must_use]
    pub fn new(kind: ProviderKind, api_key: ApiKey) -> Self {
        Self {
            kind,
            api_key,
            base_url: kind.default_base_url().to_owned(),
            model: kind.default_model().to_owned(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Sets the API base URL. Trailing slashes are removed.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim().trim_end_matches('/').to_owned();
        self
    }

    /// Sets the completion model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the completion token ceiling.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the sampling temperature, clamped to `[0, 2]`.
    ///
    /// Non-finite values keep the current temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        if temperature.is_finite() {
            self.temperature = temperature.clamp(0.0, MAX_TEMPERATURE);
        }
        self
    }

    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the provider is unsupported or its
    /// credential is missing.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through an arbitrary variable lookup.
    ///
    /// Invalid numeric overrides fall back to defaults rather than failing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the provider is unsupported or its
    /// credential is missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = match lookup(PROVIDER_ENV).filter(|value| !value.trim().is_empty()) {
            Some(value) => ProviderKind::try_from(value.as_str())?,
            None => ProviderKind::DeepSeek,
        };

        let api_key = lookup(kind.api_key_env())
            .as_deref()
            .and_then(ApiKey::new)
            .ok_or(ConfigurationError::MissingCredential {
                provider: kind.as_str(),
                variable: kind.api_key_env(),
            })?;

        let prefix = kind.env_prefix();
        let setting = |suffix: &str| {
            lookup(&format!("{prefix}_{suffix}"))
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let mut settings = Self::new(kind, api_key);
        if let Some(base_url) = setting("BASE_URL") {
            settings = settings.with_base_url(base_url);
        }
        if let Some(model) = setting("MODEL") {
            settings = settings.with_model(model);
        }
        if let Some(max_tokens) = setting("MAX_TOKENS").and_then(|raw| parse_max_tokens(&raw)) {
            settings = settings.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = setting("TEMPERATURE").and_then(|raw| raw.parse::<f32>().ok())
        {
            settings = settings.with_temperature(temperature);
        }
        Ok(settings)
    }

    /// Returns the selected backend.
    #[must_use]
    pub const fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Returns the API credential.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the completion model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the completion token ceiling.
    #[must_use]
    pub const fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Returns the sampling temperature.
    #[must_use]
    pub const fn temperature(&self) -> f32 {
        self.temperature
    }
}

fn parse_max_tokens(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|value| *value > 0)
}

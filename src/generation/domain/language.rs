//! Normalized target-language label.

use super::{MAX_LANGUAGE_LENGTH, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trimmed, lower-cased language label stored with a generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageLabel(String);

impl LanguageLabel {
    /// Normalizes a raw language label.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BlankLanguage`] when the label is empty
    /// after trimming, and [`ValidationError::LanguageTooLong`] when the
    /// lower-cased label exceeds [`MAX_LANGUAGE_LENGTH`] characters. Lower
    /// casing can lengthen a label, so the bound is checked again here.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankLanguage);
        }
        let normalized = trimmed.to_lowercase();
        let length = normalized.chars().count();
        if length > MAX_LANGUAGE_LENGTH {
            return Err(ValidationError::LanguageTooLong {
                limit: MAX_LANGUAGE_LENGTH,
                length,
            });
        }
        Ok(Self(normalized))
    }

    /// Returns the normalized label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LanguageLabel {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for LanguageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

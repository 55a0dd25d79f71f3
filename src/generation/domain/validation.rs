//! Submission validation run before any generation record exists.

use super::ValidationError;

/// Maximum number of characters accepted in trimmed submitted code.
pub const MAX_CODE_LENGTH: usize = 50_000;

/// Maximum number of characters accepted in a raw language label.
pub const MAX_LANGUAGE_LENGTH: usize = 64;

/// Checks a code and language submission.
///
/// Lengths are counted in Unicode scalar values. The code bound applies to
/// the trimmed text; the language bound applies to the label as submitted.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, checking code before
/// language.
pub fn validate_submission(code: &str, language: &str) -> Result<(), ValidationError> {
    let trimmed_code = code.trim();
    if trimmed_code.is_empty() {
        return Err(ValidationError::BlankCode);
    }
    let code_length = trimmed_code.chars().count();
    if code_length > MAX_CODE_LENGTH {
        return Err(ValidationError::CodeTooLong {
            limit: MAX_CODE_LENGTH,
            length: code_length,
        });
    }

    if language.trim().is_empty() {
        return Err(ValidationError::BlankLanguage);
    }
    let language_length = language.chars().count();
    if language_length > MAX_LANGUAGE_LENGTH {
        return Err(ValidationError::LanguageTooLong {
            limit: MAX_LANGUAGE_LENGTH,
            length: language_length,
        });
    }
    Ok(())
}

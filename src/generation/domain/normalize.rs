//! Removal of an enclosing code fence from provider output.

const FENCE: &str = "```";

/// Strips a single code fence wrapping the whole trimmed text.
///
/// A fenced reply starts and ends with a triple backtick. When the opening
/// line holds only an info string (letters, digits, or `_`, possibly empty)
/// it is dropped as a language hint. The inner text is returned trimmed. Text
/// that is not wholly enclosed, or whose inner text contains another fence,
/// is returned trimmed and otherwise unchanged, which keeps the operation
/// idempotent.
#[must_use]
pub fn normalize_response(text: &str) -> String {
    let trimmed = text.trim();
    match fenced_body(trimmed) {
        Some(body) => body.trim().to_owned(),
        None => trimmed.to_owned(),
    }
}

fn fenced_body(trimmed: &str) -> Option<&str> {
    let body = trimmed.strip_prefix(FENCE)?.strip_suffix(FENCE)?;
    let inner = match body.split_once('\n') {
        Some((first_line, rest)) if is_info_string(first_line) => rest,
        _ => body,
    };
    if inner.contains(FENCE) {
        return None;
    }
    Some(inner)
}

fn is_info_string(line: &str) -> bool {
    line.trim_end_matches('\r')
        .chars()
        .all(|ch| ch.is_alphanumeric() || ch == '_')
}

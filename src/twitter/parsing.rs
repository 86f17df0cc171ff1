//! Text formatting and validation utilities for Twitter content.
//!
//! This module contains the helpers that normalize usernames and append
//! `@mentions` to tweet text before it is submitted.

/// Normalizes a username supplied by a caller.
///
/// Surrounding whitespace and a single leading `@` are removed; the rest must be a
/// valid Twitter handle (1 to 15 letters, digits or underscores).
///
/// # Returns
///
/// - `Some(username)`: The bare username, without the `@` prefix
/// - `None`: If the input is not a valid handle
pub fn normalize_username(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix('@').unwrap_or(trimmed);

    let re = regex::Regex::new(r"^[A-Za-z0-9_]{1,15}$").ok()?;
    if re.is_match(bare) {
        Some(bare.to_string())
    } else {
        None
    }
}

/// Appends mentions to tweet content.
///
/// With no mentions the content is returned unchanged. Otherwise the mentions are
/// placed after a blank line, each prefixed with `@` and separated by spaces:
/// `format_mentions("hi", &["bob"])` yields `"hi\n\n@bob"`.
///
/// # Errors
///
/// Returns the offending entry when a mention is not a valid username.
pub fn format_mentions<S: AsRef<str>>(content: &str, mentions: &[S]) -> Result<String, String> {
    let handles = mentions
        .iter()
        .map(|m| {
            normalize_username(m.as_ref())
                .map(|u| format!("@{}", u))
                .ok_or_else(|| m.as_ref().to_string())
        })
        .collect::<Result<Vec<_>, _>>()?;

    if handles.is_empty() {
        Ok(content.to_string())
    } else {
        Ok(format!("{}\n\n{}", content, handles.join(" ")))
    }
}

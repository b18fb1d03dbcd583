//! CLI parsing helpers for clap value parsers.

/// Validate a translator program name.
///
/// The name is embedded unquoted in a shell script, so it must be a single
/// word without quoting or expansion characters.
pub(super) fn parse_translator(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("translator must not be empty".to_owned());
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '+'))
    {
        return Err(format!(
            "translator '{s}' may only contain ASCII letters, digits, and `_-./+`"
        ));
    }
    Ok(trimmed.to_owned())
}

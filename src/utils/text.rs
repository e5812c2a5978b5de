//! Plain-text helpers for page metadata.

/// Shorten `s` to at most `max_len` bytes, cutting at the last word boundary
/// and appending `...`.
///
/// Leading/trailing whitespace is trimmed first. Text that already fits is
/// returned unchanged; `max_len == 0` yields an empty string.
pub fn truncate(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    let s = s.trim();
    if s.len() <= max_len {
        return s.to_string();
    }

    // Never split a multi-byte character.
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    let mut truncated = &s[..end];

    if let Some(pos) = truncated.rfind(char::is_whitespace)
        && pos > 0
    {
        truncated = &truncated[..pos];
    }

    format!("{}...", truncated.trim_end())
}

//! HTML utility functions.
//!
//! - `escape()`, `escape_attr()` - HTML entity escaping
//! - `strip_ansi()` - Drop terminal color codes from error text
//! - `inject_before_body_end()` - Splice markup before `</body>`

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("<script>"), "&lt;script&gt;");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape HTML attribute values.
///
/// Identical to `escape()` but semantically indicates attribute context.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape(s)
}

// =============================================================================
// ANSI Stripping
// =============================================================================

/// Remove ANSI escape sequences (`\x1b[...m`) from a string.
///
/// Config diagnostics are colored for the terminal; the browser error page
/// shows the same text without the codes.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            result.push(c);
            continue;
        }
        if chars.peek() != Some(&'[') {
            continue;
        }
        chars.next();
        while let Some(&ch) = chars.peek() {
            if ch.is_ascii_digit() || ch == ';' {
                chars.next();
            } else {
                break;
            }
        }
        if chars.peek() == Some(&'m') {
            chars.next();
        }
    }

    Cow::Owned(result)
}

// =============================================================================
// Injection
// =============================================================================

/// Insert `snippet` right before the last `</body>` tag.
///
/// Falls back to appending when the document has no closing body tag.
pub fn inject_before_body_end(html: &str, snippet: &str) -> String {
    let mut out = String::with_capacity(html.len() + snippet.len());
    match html.rfind("</body>") {
        Some(pos) => {
            out.push_str(&html[..pos]);
            out.push_str(snippet);
            out.push_str(&html[pos..]);
        }
        None => {
            out.push_str(html);
            out.push_str(snippet);
        }
    }
    out
}

// =============================================================================
// Tests
// =============================================================================

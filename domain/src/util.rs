//! Shared utility functions.

/// Truncate a string to at most `max_chars` characters.
///
/// Returns a sub-slice of the original string. If the string is shorter than
/// `max_chars`, the entire string is returned unchanged.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

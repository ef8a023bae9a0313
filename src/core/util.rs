//! Common utilities

/// Keep the first `max_lines` lines of `s`
pub fn truncate_lines(s: &str, max_lines: usize) -> String {
    s.split('\n').take(max_lines).collect::<Vec<_>>().join("\n")
}

/// Keep the first `max_chars` characters of `s`
///
/// Counts Unicode scalar values, so a multi-byte character is never split.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => s[..end].to_string(),
        None => s.to_string(),
    }
}

/// Split text into lines on `\n` only
///
/// Unlike `str::lines`, a trailing newline yields a final empty line, so line
/// numbers agree with what an editor shows.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

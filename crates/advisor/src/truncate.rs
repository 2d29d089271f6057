//! UTF-8-safe prompt truncation.

/// Take the longest prefix of `text` that fits in `max_bytes` without
/// splitting a multi-byte character.
pub fn truncate_utf8(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

// Output helpers shared by the colored CLI reports and the HTML media kit.

pub mod terminal;

/// Shorten a caption or insight to `max_chars` characters, adding "..." when
/// anything was cut. Counts characters, not bytes, so multi-byte text such as
/// emoji is never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

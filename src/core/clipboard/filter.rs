use crate::shared::types::ClipboardEntry;

/// Entries whose content contains `query`, ignoring case, in their original order.
/// An empty query matches everything.
pub fn filter_entries(entries: &[ClipboardEntry], query: &str) -> Vec<ClipboardEntry> {
    if query.is_empty() {
        return entries.to_vec();
    }
    let query_lower = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.content.to_lowercase().contains(&query_lower))
        .cloned()
        .collect()
}

/// First `max_chars` characters of `content`, with `...` appended when cut
pub fn preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

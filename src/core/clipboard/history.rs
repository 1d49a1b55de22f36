use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::shared::types::ClipboardEntry;
use super::filter::filter_entries;

/// Default number of entries kept
pub const DEFAULT_HISTORY_SIZE: usize = 10;

struct HistoryState {
    /// Oldest first
    entries: VecDeque<ClipboardEntry>,
    capacity: usize,
    copy_count: u64,
}

/// In-memory clipboard history.
///
/// Entries are kept in arrival order and trimmed from the front once the
/// capacity is exceeded. Duplicates are checked only against what is
/// currently retained, so content evicted earlier may be recorded again.
#[derive(Clone)]
pub struct ClipboardHistory {
    state: Arc<Mutex<HistoryState>>,
}

impl ClipboardHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Arc::new(Mutex::new(HistoryState {
                entries: VecDeque::with_capacity(capacity + 1),
                capacity,
                copy_count: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("[ClipboardHistory] Mutex poisoned, recovering...");
                poisoned.into_inner()
            }
        }
    }

    /// Record `content` unless it is empty or already retained.
    ///
    /// `make_entry` is only invoked when the content is new. Returns the
    /// recorded entry.
    pub fn record_with<F>(&self, content: &str, make_entry: F) -> Option<ClipboardEntry>
    where
        F: FnOnce() -> ClipboardEntry,
    {
        if content.is_empty() {
            return None;
        }

        let mut state = self.lock();
        if state.entries.iter().any(|entry| entry.content == content) {
            return None;
        }

        let entry = make_entry();
        state.entries.push_back(entry.clone());
        while state.entries.len() > state.capacity {
            state.entries.pop_front();
        }
        state.copy_count += 1;
        Some(entry)
    }

    pub fn contains(&self, content: &str) -> bool {
        self.lock().entries.iter().any(|entry| entry.content == content)
    }

    /// All retained entries, oldest first
    pub fn entries(&self) -> Vec<ClipboardEntry> {
        self.lock().entries.iter().cloned().collect()
    }

    /// Retained entries whose content contains `query`, ignoring case
    pub fn filter(&self, query: &str) -> Vec<ClipboardEntry> {
        let entries = self.entries();
        filter_entries(&entries, query)
    }

    /// Number of entries recorded since creation or the last clear
    pub fn copy_count(&self) -> u64 {
        self.lock().copy_count
    }

    /// Drop every entry and reset the copy counter
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.copy_count = 0;
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity
    }
}

impl Default for ClipboardHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::SourceContext;

    fn entry(content: &str) -> ClipboardEntry {
        ClipboardEntry::new(
            content.to_string(),
            SourceContext {
                source: "Notepad".to_string(),
                url: None,
                suggestion: None,
            },
        )
    }

    fn record(history: &ClipboardHistory, content: &str) -> bool {
        history.record_with(content, || entry(content)).is_some()
    }

    #[test]
    fn test_add_and_get_items() {
        let history = ClipboardHistory::default();

        assert!(record(&history, "First item"));
        assert!(record(&history, "Second item"));

        let items = history.entries();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].content, "First item");
        assert_eq!(items[1].content, "Second item");
    }

    #[test]
    fn test_max_history_size_keeps_newest() {
        let history = ClipboardHistory::default();

        for i in 0..15 {
            record(&history, &format!("Item {}", i));
        }

        let contents: Vec<String> = history.entries().into_iter().map(|e| e.content).collect();
        let expected: Vec<String> = (5..15).map(|i| format!("Item {}", i)).collect();
        assert_eq!(contents, expected);
        assert_eq!(history.copy_count(), 15);
    }

    #[test]
    fn test_skip_duplicate() {
        let history = ClipboardHistory::default();

        assert!(record(&history, "Same content"));
        assert!(!record(&history, "Same content"));
        record(&history, "Other");
        assert!(!record(&history, "Same content"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.copy_count(), 2);
    }

    #[test]
    fn test_entry_not_built_for_duplicates_or_empty() {
        let history = ClipboardHistory::default();
        record(&history, "x");

        let built = std::cell::Cell::new(false);
        history.record_with("x", || { built.set(true); entry("x") });
        history.record_with("", || { built.set(true); entry("") });

        assert!(!built.get());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_evicted_content_can_return() {
        let history = ClipboardHistory::new(2);
        record(&history, "a");
        record(&history, "b");
        record(&history, "c");
        assert!(!history.contains("a"));

        assert!(record(&history, "a"));
        let contents: Vec<String> = history.entries().into_iter().map(|e| e.content).collect();
        assert_eq!(contents, vec!["c", "a"]);
    }

    #[test]
    fn test_clear() {
        let history = ClipboardHistory::default();

        record(&history, "Item 1");
        record(&history, "Item 2");
        assert_eq!(history.len(), 2);

        history.clear();

        assert!(history.is_empty());
        assert_eq!(history.copy_count(), 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let history = ClipboardHistory::new(0);
        record(&history, "a");
        record(&history, "b");
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.entries()[0].content, "b");
    }
}

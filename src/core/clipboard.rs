//! Clipboard module
//!
//! Provides clipboard history tracking and monitoring functionality.
//!
//! - `history`: bounded, deduplicated in-memory log of copied text
//! - `filter`: case-insensitive search over the log and preview helpers
//! - `monitor`: scheduled task that drives the tracker's poll tick
//! - `backend`: clipboard implementations (system and in-memory)

pub mod backend;
pub mod filter;
pub mod history;
pub mod monitor;

pub use backend::MemoryClipboard;
#[cfg(feature = "system-clipboard")]
pub use backend::SystemClipboard;
pub use filter::{filter_entries, preview};
pub use history::ClipboardHistory;
pub use monitor::ClipboardMonitor;

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::shared::error::ClipboardError;

/// Read/write access to a text clipboard
#[async_trait]
pub trait ClipboardAccess: Send + Sync {
    async fn read_text(&self) -> Result<String, ClipboardError>;

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Whether the host surface currently holds input focus
pub trait FocusSignal: Send + Sync {
    fn has_focus(&self) -> bool;
}

/// Focus flag set by the display surface
#[derive(Clone, Default)]
pub struct SharedFocus {
    focused: Arc<AtomicBool>,
}

impl SharedFocus {
    pub fn new(focused: bool) -> Self {
        Self {
            focused: Arc::new(AtomicBool::new(focused)),
        }
    }

    pub fn set(&self, focused: bool) {
        self.focused.store(focused, Ordering::SeqCst);
    }
}

impl FocusSignal for SharedFocus {
    fn has_focus(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_focus_clones_share_state() {
        let focus = SharedFocus::new(false);
        let other = focus.clone();
        assert!(!other.has_focus());
        focus.set(true);
        assert!(other.has_focus());
    }
}

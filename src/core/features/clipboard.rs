//! Clipboard history feature
//!
//! Ties the clipboard, focus signal, simulated context, history and toast
//! service together. Display surfaces forward user actions here and observe
//! changes through `subscribe`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::clipboard::{preview, ClipboardAccess, ClipboardHistory, FocusSignal};
use crate::core::context::{ContextSource, RandomContext};
use crate::core::observer::{ObserverRegistry, Subscription};
use crate::core::toast::ToastService;
use crate::shared::error::{AppResult, ClipboardError};
use crate::shared::events::AppEvent;
use crate::shared::settings::TrackerSettings;
use crate::shared::types::ClipboardEntry;

pub const READ_FAILED_MESSAGE: &str = "Clipboard read failed. Please check permissions.";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy to clipboard.";
pub const CLEARED_MESSAGE: &str = "Clipboard history cleared.";
pub const NO_MATCHES_MESSAGE: &str = "No matches found.";
pub const EMPTY_HISTORY_MESSAGE: &str = "No clipboard history yet. Copy some text to get started!";

/// Result of a single poll tick
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Host surface lacks focus; the clipboard was not touched
    Unfocused,
    /// A previous tick is still reading
    Busy,
    Empty,
    Duplicate,
    Recorded(ClipboardEntry),
    PermissionDenied,
    Failed(ClipboardError),
}

/// Marks a read in flight; released on drop
struct PollGuard<'a>(&'a AtomicBool);

impl<'a> PollGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| PollGuard(flag))
    }
}

impl Drop for PollGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct ClipboardTracker {
    clipboard: Arc<dyn ClipboardAccess>,
    focus: Arc<dyn FocusSignal>,
    context: Arc<dyn ContextSource>,
    history: ClipboardHistory,
    toasts: ToastService,
    events: ObserverRegistry<AppEvent>,
    polling: Arc<AtomicBool>,
    preview_chars: usize,
}

impl ClipboardTracker {
    pub fn new(
        clipboard: Arc<dyn ClipboardAccess>,
        focus: Arc<dyn FocusSignal>,
        toasts: ToastService,
        settings: &TrackerSettings,
    ) -> Self {
        Self {
            clipboard,
            focus,
            context: Arc::new(RandomContext),
            history: ClipboardHistory::new(settings.history_capacity),
            toasts,
            events: ObserverRegistry::new(),
            polling: Arc::new(AtomicBool::new(false)),
            preview_chars: settings.preview_chars,
        }
    }

    /// Replace the simulated context source
    pub fn with_context_source(mut self, context: Arc<dyn ContextSource>) -> Self {
        self.context = context;
        self
    }

    /// Read the clipboard once and record new content.
    ///
    /// Does nothing without focus or while another tick is still reading.
    /// Permission denials are ignored; other read failures are logged and
    /// reported as a toast. Polling continues either way.
    pub async fn poll_tick(&self) -> PollOutcome {
        if !self.focus.has_focus() {
            return PollOutcome::Unfocused;
        }
        let Some(_guard) = PollGuard::acquire(&self.polling) else {
            log::trace!("[ClipboardTracker] Previous read still pending, skipping tick");
            return PollOutcome::Busy;
        };

        match self.clipboard.read_text().await {
            Ok(content) if content.is_empty() => PollOutcome::Empty,
            Ok(content) => {
                let recorded = self.history.record_with(&content, || {
                    ClipboardEntry::new(content.clone(), self.context.synthesize())
                });
                match recorded {
                    Some(entry) => {
                        log::debug!(
                            "[ClipboardTracker] Recorded {} chars from {}",
                            entry.content.chars().count(),
                            entry.source
                        );
                        self.publish_history();
                        PollOutcome::Recorded(entry)
                    }
                    None => PollOutcome::Duplicate,
                }
            }
            Err(ClipboardError::PermissionDenied) => PollOutcome::PermissionDenied,
            Err(err) => {
                log::error!("[ClipboardTracker] Failed to read clipboard: {}", err);
                self.toasts.request(READ_FAILED_MESSAGE);
                PollOutcome::Failed(err)
            }
        }
    }

    /// Write `content` back to the clipboard and confirm with a toast.
    /// History is not modified either way.
    pub async fn copy_back(&self, content: &str) -> AppResult<()> {
        match self.clipboard.write_text(content).await {
            Ok(()) => {
                self.toasts
                    .request(format!("Copied: \"{}\"", preview(content, self.preview_chars)));
                Ok(())
            }
            Err(err) => {
                log::error!("[ClipboardTracker] Failed to copy: {}", err);
                self.toasts.request(COPY_FAILED_MESSAGE);
                Err(err.into())
            }
        }
    }

    /// Empty the history, reset the copy counter and confirm with a toast
    pub fn clear_history(&self) {
        self.history.clear();
        log::info!("[ClipboardTracker] Cleared clipboard history");
        self.toasts.request(CLEARED_MESSAGE);
        self.publish_history();
    }

    /// Retained entries whose content contains `query`, ignoring case
    pub fn filter(&self, query: &str) -> Vec<ClipboardEntry> {
        self.history.filter(query)
    }

    /// Retained entries, oldest first
    pub fn entries(&self) -> Vec<ClipboardEntry> {
        self.history.entries()
    }

    pub fn copy_count(&self) -> u64 {
        self.history.copy_count()
    }

    /// Placeholder text for an empty filtered view
    pub fn empty_message(query: &str) -> &'static str {
        if query.is_empty() {
            EMPTY_HISTORY_MESSAGE
        } else {
            NO_MATCHES_MESSAGE
        }
    }

    pub fn toasts(&self) -> &ToastService {
        &self.toasts
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }

    pub(crate) fn publish(&self, event: AppEvent) {
        self.events.notify(&event);
    }

    fn publish_history(&self) {
        self.publish(AppEvent::HistoryUpdated {
            entries: self.history.entries(),
            copy_count: self.history.copy_count(),
        });
    }
}

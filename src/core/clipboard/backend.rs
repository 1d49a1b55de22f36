use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use super::ClipboardAccess;
use crate::shared::error::ClipboardError;

fn lock<'a, T>(mutex: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("[MemoryClipboard] Mutex poisoned in {}(), recovering...", context);
            poisoned.into_inner()
        }
    }
}

/// Process-local clipboard.
///
/// Used when no system clipboard is available, and by tests to script
/// clipboard contents and failures.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    content: Arc<Mutex<String>>,
    read_error: Arc<Mutex<Option<ClipboardError>>>,
    write_error: Arc<Mutex<Option<ClipboardError>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate another application copying text
    pub fn set_content(&self, text: impl Into<String>) {
        *lock(&self.content, "set_content") = text.into();
    }

    pub fn content(&self) -> String {
        lock(&self.content, "content").clone()
    }

    /// Make every read fail with `error` until cleared with `None`
    pub fn fail_reads(&self, error: Option<ClipboardError>) {
        *lock(&self.read_error, "fail_reads") = error;
    }

    /// Make every write fail with `error` until cleared with `None`
    pub fn fail_writes(&self, error: Option<ClipboardError>) {
        *lock(&self.write_error, "fail_writes") = error;
    }
}

#[async_trait]
impl ClipboardAccess for MemoryClipboard {
    async fn read_text(&self) -> Result<String, ClipboardError> {
        if let Some(err) = lock(&self.read_error, "read_text").clone() {
            return Err(err);
        }
        Ok(self.content())
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if let Some(err) = lock(&self.write_error, "write_text").clone() {
            return Err(err);
        }
        self.set_content(text);
        Ok(())
    }
}

/// The operating system clipboard.
///
/// Native calls are blocking, so each access runs on tokio's blocking pool.
#[cfg(feature = "system-clipboard")]
#[derive(Clone, Default)]
pub struct SystemClipboard;

#[cfg(feature = "system-clipboard")]
#[async_trait]
impl ClipboardAccess for SystemClipboard {
    async fn read_text(&self) -> Result<String, ClipboardError> {
        let result = tokio::task::spawn_blocking(|| {
            cli_clipboard::get_contents().map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| ClipboardError::Read(format!("Clipboard task failed: {}", e)))?;

        ClipboardError::from_read_result(result)
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_string();
        let result = tokio::task::spawn_blocking(move || {
            cli_clipboard::set_contents(text).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| ClipboardError::Write(format!("Clipboard task failed: {}", e)))?;

        result.map_err(ClipboardError::Write)
    }
}

/// Pick the clipboard for the running platform
pub fn default_clipboard() -> Arc<dyn ClipboardAccess> {
    #[cfg(feature = "system-clipboard")]
    {
        Arc::new(SystemClipboard)
    }
    #[cfg(not(feature = "system-clipboard"))]
    {
        log::warn!("[Clipboard] Built without system clipboard support, using in-memory fallback");
        Arc::new(MemoryClipboard::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_clipboard_round_trip() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.read_text().await.unwrap(), "");

        clipboard.write_text("copied").await.unwrap();
        assert_eq!(clipboard.read_text().await.unwrap(), "copied");
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let clipboard = MemoryClipboard::new();
        clipboard.set_content("kept");

        clipboard.fail_reads(Some(ClipboardError::PermissionDenied));
        assert_eq!(clipboard.read_text().await, Err(ClipboardError::PermissionDenied));

        clipboard.fail_writes(Some(ClipboardError::Write("busy".to_string())));
        assert!(clipboard.write_text("new").await.is_err());
        assert_eq!(clipboard.content(), "kept");

        clipboard.fail_reads(None);
        assert_eq!(clipboard.read_text().await.unwrap(), "kept");
    }
}

//! Clipboard History Pipe
//!
//! Polls the clipboard while the host surface has focus, keeps the last few
//! unique text entries with simulated context, and reports outcomes through
//! a small toast queue.

pub mod shared;
pub mod core;
pub mod system;

use std::sync::Arc;

use crate::core::clipboard::{backend, ClipboardAccess, ClipboardMonitor, SharedFocus};
use crate::core::features::ClipboardTracker;
use crate::core::toast::ToastService;
use crate::shared::error::AppResult;
use crate::shared::settings::AppSettings;
use crate::system::ConsoleSurface;

/// Everything the display surface needs, built once at startup
pub struct App {
    pub settings: AppSettings,
    pub toasts: ToastService,
    pub tracker: ClipboardTracker,
    pub monitor: Arc<ClipboardMonitor>,
    pub focus: SharedFocus,
}

impl App {
    pub fn new(settings: AppSettings, clipboard: Arc<dyn ClipboardAccess>) -> Self {
        let focus = SharedFocus::new(false);
        let toasts = ToastService::new(settings.toasts.clone());
        let tracker = ClipboardTracker::new(
            clipboard,
            Arc::new(focus.clone()),
            toasts.clone(),
            &settings.tracker,
        );
        let monitor = Arc::new(ClipboardMonitor::new(tracker.clone(), settings.tracker.poll_interval()));

        Self { settings, toasts, tracker, monitor, focus }
    }
}

/// Load settings, start polling and run the terminal surface until it closes
pub async fn run() -> AppResult<()> {
    let settings = AppSettings::load()
        .await
        .unwrap_or_else(|e| {
            log::error!("Failed to load settings: {}", e);
            AppSettings::default()
        })
        .validated();

    let app = App::new(settings, backend::default_clipboard());
    app.monitor.start()?;
    log::info!("Clipboard monitoring started");

    let surface = ConsoleSurface::new(app.tracker.clone(), Arc::clone(&app.monitor), app.focus.clone());
    let result = surface.run().await;

    app.monitor.stop();
    app.toasts.shutdown();
    result
}

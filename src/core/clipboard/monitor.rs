use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::features::{ClipboardTracker, PollOutcome};
use crate::shared::error::{AppError, AppResult};
use crate::shared::events::AppEvent;

/// Drives the tracker's poll tick on a fixed interval.
///
/// The polling task lives between `start` and `stop` (or drop). Ticks run one
/// after another, so a slow read delays the next tick instead of overlapping it.
pub struct ClipboardMonitor {
    tracker: ClipboardTracker,
    interval: Duration,
    enabled: Arc<AtomicBool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ClipboardMonitor {
    pub fn new(tracker: ClipboardTracker, interval: Duration) -> Self {
        Self {
            tracker,
            // tokio's interval rejects a zero period
            interval: interval.max(Duration::from_millis(1)),
            enabled: Arc::new(AtomicBool::new(true)),
            task: Mutex::new(None),
        }
    }

    fn task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        match self.task.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("[ClipboardMonitor] Mutex poisoned, recovering...");
                poisoned.into_inner()
            }
        }
    }

    /// Spawn the polling task on the current tokio runtime.
    /// Starting an already running monitor is a no-op.
    pub fn start(&self) -> AppResult<()> {
        let mut task = self.task();
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Ok(());
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| AppError::System(format!("Clipboard monitor needs a tokio runtime: {}", e)))?;

        let tracker = self.tracker.clone();
        let enabled = Arc::clone(&self.enabled);
        let period = self.interval;

        *task = Some(runtime.spawn(async move {
            log::info!("[ClipboardMonitor] Started monitoring every {:?}", period);
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick fires immediately; polling starts one period in
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if !enabled.load(Ordering::SeqCst) {
                    continue;
                }
                match tracker.poll_tick().await {
                    PollOutcome::Recorded(_) => log::trace!("[ClipboardMonitor] Tick recorded a change"),
                    PollOutcome::Failed(err) => log::trace!("[ClipboardMonitor] Tick failed: {}", err),
                    _ => {}
                }
            }
        }));
        Ok(())
    }

    /// Cancel the polling task. Safe to call when not running.
    pub fn stop(&self) {
        if let Some(handle) = self.task().take() {
            handle.abort();
            log::info!("[ClipboardMonitor] Stopped monitoring");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Resume polling without restarting the task
    pub fn enable(&self) {
        self.set_enabled(true);
    }

    /// Pause polling; the task keeps ticking but skips the clipboard
    pub fn disable(&self) {
        self.set_enabled(false);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Flip between paused and polling, returning the new state
    pub fn toggle(&self) -> bool {
        let enabled = !self.enabled.fetch_xor(true, Ordering::SeqCst);
        log::info!("[ClipboardMonitor] Toggled to {}", enabled);
        self.tracker.publish(AppEvent::MonitorToggled(enabled));
        enabled
    }

    fn set_enabled(&self, enabled: bool) {
        let previous = self.enabled.swap(enabled, Ordering::SeqCst);
        if previous != enabled {
            log::info!("[ClipboardMonitor] {}", if enabled { "Enabled" } else { "Disabled" });
            self.tracker.publish(AppEvent::MonitorToggled(enabled));
        }
    }
}

impl Drop for ClipboardMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

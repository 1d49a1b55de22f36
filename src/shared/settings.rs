use serde::{Deserialize, Serialize};
use tokio::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use directories::ProjectDirs;

use super::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppSettings {
    pub tracker: TrackerSettings,
    pub toasts: ToastSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    pub poll_interval_ms: u64,
    pub history_capacity: usize,
    /// Characters of content shown in the copy confirmation
    pub preview_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastSettings {
    /// Maximum number of toasts held at once
    pub limit: usize,
    /// Delay between dismissal and removal
    pub remove_delay_ms: u64,
    /// Display time before a toast dismisses itself; `None` keeps it until dismissed
    pub auto_dismiss_ms: Option<u64>,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            history_capacity: 10,
            preview_chars: 20,
        }
    }
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self {
            limit: 1,
            remove_delay_ms: 3000,
            auto_dismiss_ms: Some(5000),
        }
    }
}

impl TrackerSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl ToastSettings {
    pub fn remove_delay(&self) -> Duration {
        Duration::from_millis(self.remove_delay_ms)
    }

    pub fn auto_dismiss(&self) -> Option<Duration> {
        self.auto_dismiss_ms.map(Duration::from_millis)
    }
}

impl AppSettings {
    pub fn get_settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "antigravity", "clipboard-history-pipe")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::Config("Failed to determine config directory".to_string()))
    }

    /// Load from the platform config directory, falling back to defaults when absent
    pub async fn load() -> AppResult<Self> {
        let path = Self::get_settings_path()?;
        if !path.exists() {
            log::debug!("[Settings] No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).await
            .map_err(|e| AppError::Io(format!("Failed to read settings file: {}", e)))?;
        let settings: Self = serde_json::from_str(&content)?;
        log::info!("[Settings] Loaded settings from {}", path.display());
        Ok(settings.validated())
    }

    /// Clamp values that would make the tracker or toast queue unusable
    pub fn validated(mut self) -> Self {
        if self.tracker.poll_interval_ms == 0 {
            log::warn!("[Settings] poll_interval_ms of 0 clamped to 1");
            self.tracker.poll_interval_ms = 1;
        }
        if self.tracker.history_capacity == 0 {
            log::warn!("[Settings] history_capacity of 0 clamped to 1");
            self.tracker.history_capacity = 1;
        }
        if self.toasts.limit == 0 {
            log::warn!("[Settings] toast limit of 0 clamped to 1");
            self.toasts.limit = 1;
        }
        self
    }
}

use serde::{Serialize, Deserialize};
use super::types::ClipboardEntry;

/// Events published by the clipboard tracker to its display surfaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum AppEvent {
    #[serde(rename = "clipboard://history-updated")]
    HistoryUpdated {
        entries: Vec<ClipboardEntry>,
        copy_count: u64,
    },

    #[serde(rename = "clipboard://monitor-toggled")]
    MonitorToggled(bool),
}

use serde::{Deserialize, Serialize};
use chrono::{Local, TimeZone, Utc};

/// Simulated context attached to a clipboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceContext {
    pub source: String,
    pub url: Option<String>,
    pub suggestion: Option<String>,
}

/// One recorded clipboard change. Immutable once created.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    pub content: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub source: String,
    pub url: Option<String>,
    pub suggestion: Option<String>,
    pub task_group: String,
}

// Content is user data; keep it out of logs.
impl std::fmt::Debug for ClipboardEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardEntry")
            .field("content", &format!("[REDACTED {} chars]", self.content.chars().count()))
            .field("timestamp", &self.timestamp)
            .field("source", &self.source)
            .field("url", &self.url)
            .field("suggestion", &self.suggestion)
            .field("task_group", &self.task_group)
            .finish()
    }
}

impl ClipboardEntry {
    /// Create an entry stamped with the current time
    pub fn new(content: String, context: SourceContext) -> Self {
        Self::with_timestamp(content, context, Utc::now().timestamp_millis())
    }

    pub fn with_timestamp(content: String, context: SourceContext, timestamp: i64) -> Self {
        Self {
            content,
            timestamp,
            task_group: context.source.clone(),
            source: context.source,
            url: context.url,
            suggestion: context.suggestion,
        }
    }

    /// Local wall-clock time of the copy, e.g. `3:07:42 PM`
    pub fn display_time(&self) -> String {
        match Local.timestamp_millis_opt(self.timestamp).single() {
            Some(time) => time.format("%-I:%M:%S %p").to_string(),
            None => String::from("--:--:--"),
        }
    }
}

/// A transient notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastRecord {
    pub id: String,
    pub title: Option<String>,
    pub description: String,
    pub open: bool,
}

impl ToastRecord {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: None,
            description: description.into(),
            open: true,
        }
    }

    /// Merge the set fields of `patch` into this record
    pub fn apply(&mut self, patch: &ToastPatch) {
        if let Some(title) = &patch.title {
            self.title = Some(title.clone());
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(open) = patch.open {
            self.open = open;
        }
    }
}

/// Partial change to a toast; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub open: Option<bool>,
}

impl ToastPatch {
    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }
}

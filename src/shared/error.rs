use thiserror::Error;
use serde::Serialize;

/// Failures reported by a clipboard backend.
///
/// `PermissionDenied` is the expected outcome when the host refuses access
/// (for example while the surface is unfocused) and is handled silently by
/// the tracker. The other variants are surfaced to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum ClipboardError {
    #[error("Clipboard access denied")]
    PermissionDenied,

    #[error("Clipboard read failed: {0}")]
    Read(String),

    #[error("Clipboard write failed: {0}")]
    Write(String),
}

impl ClipboardError {
    /// Classify a raw backend read message
    pub fn from_read_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if is_permission_message(&message) {
            ClipboardError::PermissionDenied
        } else {
            ClipboardError::Read(message)
        }
    }

    /// Interpret a raw backend read result. A backend reporting that the
    /// clipboard holds no text (nothing copied yet, or an image) reads as
    /// empty content rather than a failure.
    pub fn from_read_result(result: Result<String, String>) -> Result<String, Self> {
        match result {
            Ok(text) => Ok(text),
            Err(message) if is_no_text_message(&message) => Ok(String::new()),
            Err(message) => Err(Self::from_read_message(message)),
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ClipboardError::PermissionDenied)
    }
}

// macOS pasteboard reads without a string item
fn is_no_text_message(message: &str) -> bool {
    let message = message.trim_end();
    message.ends_with("returned empty") || message.ends_with("returned null")
}

fn is_permission_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("permission") || lower.contains("denied") || lower.contains("not allowed")
}

#[derive(Error, Debug, Serialize)]
pub enum AppError {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("System Error: {0}")]
    System(String),

    #[error("Clipboard Error: {0}")]
    Clipboard(#[from] ClipboardError),

}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(format!("Serialization error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

pub mod types;
pub mod settings;
pub mod error;
pub mod events;

// Re-export the error types for convenience
pub use error::{AppError, AppResult, ClipboardError};

//! Toast notifications
//!
//! A toast moves through `open -> dismissed (open = false) -> removed`.
//! `reducer` holds the pure state transitions; `service` owns the shared
//! queue, the per-id removal timers and the subscriber registry.

pub mod reducer;
pub mod service;

pub use reducer::{reduce, ToastAction, ToastState};
pub use service::{ToastHandle, ToastService};

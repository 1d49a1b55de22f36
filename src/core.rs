//! Core logic: clipboard tracking, simulated context, and toast notifications

pub mod observer;
pub mod clipboard;
pub mod context;
pub mod toast;
pub mod features;

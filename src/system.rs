//! Host integration: display surfaces

pub mod console;

pub use console::ConsoleSurface;

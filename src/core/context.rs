//! Context synthesis for clipboard entries
//!
//! Entries carry a source application, an optional originating URL and an
//! optional related suggestion. Nothing here inspects the real system; the
//! values are simulated.

pub mod detection;

pub use detection::{FixedContext, RandomContext};

use crate::shared::types::SourceContext;

/// Produces the context attached to a newly recorded entry
pub trait ContextSource: Send + Sync {
    fn synthesize(&self) -> SourceContext;
}

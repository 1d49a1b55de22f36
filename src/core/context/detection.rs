use rand::seq::SliceRandom;
use rand::Rng;

use super::ContextSource;
use crate::shared::types::SourceContext;

pub const SOURCE_APPS: [&str; 4] = ["Notepad", "Chrome", "Word", "VS Code"];
pub const SOURCE_URLS: [Option<&str>; 3] = [
    Some("https://example.com"),
    Some("https://docs.screenpi.pe"),
    None,
];
pub const RELATED_SUGGESTION: &str = "Related text from same page";

/// Picks source, URL and suggestion uniformly at random from fixed sets
#[derive(Debug, Clone, Default)]
pub struct RandomContext;

impl ContextSource for RandomContext {
    fn synthesize(&self) -> SourceContext {
        let mut rng = rand::thread_rng();
        let source = SOURCE_APPS.choose(&mut rng).copied().unwrap_or(SOURCE_APPS[0]);
        let url = SOURCE_URLS.choose(&mut rng).copied().flatten();
        let suggestion = rng.gen_bool(0.5).then(|| RELATED_SUGGESTION.to_string());

        SourceContext {
            source: source.to_string(),
            url: url.map(str::to_string),
            suggestion,
        }
    }
}

/// Always returns the same context
#[derive(Debug, Clone)]
pub struct FixedContext(pub SourceContext);

impl ContextSource for FixedContext {
    fn synthesize(&self) -> SourceContext {
        self.0.clone()
    }
}

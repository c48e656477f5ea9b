//! Shared collaborators handed to every tool call.

use std::sync::Arc;

use pagefetch::{ExtractorConfig, Fetcher};

/// Immutable per-server state. Cloning is cheap; nothing here is mutated by calls.
#[derive(Clone)]
pub struct ToolContext {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<ExtractorConfig>,
}

impl ToolContext {
    pub fn new(fetcher: Arc<dyn Fetcher>, extractor: ExtractorConfig) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(extractor),
        }
    }

    pub fn fetcher(&self) -> &dyn Fetcher {
        self.fetcher.as_ref()
    }

    pub fn extractor(&self) -> &ExtractorConfig {
        &self.extractor
    }
}

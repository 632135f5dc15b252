//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::PagePipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    pipeline: PagePipeline,
}

impl AppState {
    pub fn new(config: Config, pipeline: PagePipeline) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the page pipeline
    pub fn pipeline(&self) -> &PagePipeline {
        &self.inner.pipeline
    }
}

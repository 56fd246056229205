/// Essay content pipeline: fetch the markdown source, decode it and render
/// it to HTML.
pub mod fetch;
pub mod render;

pub use fetch::{
    is_remote_location, ContentFetcher, FetchError, FileFetcher, HttpFetcher, MemoryFetcher,
    SourceFetcher,
};
pub use render::{MarkdownRenderer, RenderError, Renderer};

use crate::catalog::EssayDescriptor;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default time allowed for a single fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Why an essay could not be shown
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Fetches and renders essays. One attempt per call, no retries.
#[derive(Clone)]
pub struct ContentLoader {
    fetcher: Arc<dyn ContentFetcher>,
    renderer: Arc<dyn Renderer>,
    timeout: Duration,
}

impl ContentLoader {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            fetcher,
            renderer,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the essay's markdown and render it to HTML
    pub async fn load(&self, essay: &EssayDescriptor) -> Result<String, LoadError> {
        let location = essay.content_location.as_str();
        tracing::debug!("Loading essay {} from {}", essay.identifier, location);

        let bytes = match tokio::time::timeout(self.timeout, self.fetcher.fetch(location)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(FetchError::Timeout {
                    location: location.to_string(),
                    after: self.timeout,
                }
                .into())
            }
        };

        let markdown = String::from_utf8(bytes).map_err(|e| RenderError::InvalidUtf8 {
            valid_up_to: e.utf8_error().valid_up_to(),
        })?;

        let html = self.renderer.render(&markdown)?;
        tracing::debug!(
            "Rendered essay {} ({} bytes markdown, {} bytes html)",
            essay.identifier,
            markdown.len(),
            html.len()
        );
        Ok(html)
    }
}

impl std::fmt::Debug for ContentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentLoader")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

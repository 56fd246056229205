use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failures while retrieving essay source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Essay source not found: {location}")]
    NotFound { location: String },

    #[error("Failed to read {location}: {message}")]
    Io { location: String, message: String },

    #[error("Server returned {status} for {location}")]
    Status { location: String, status: u16 },

    #[error("Network error fetching {location}: {message}")]
    Transport { location: String, message: String },

    #[error("Timed out after {after:?} fetching {location}")]
    Timeout { location: String, after: Duration },
}

/// Retrieves the raw bytes behind an essay's content location
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError>;
}

/// True for http(s) URLs, false for anything treated as a file path
pub fn is_remote_location(location: &str) -> bool {
    url::Url::parse(location)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Reads essays from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    root: Option<PathBuf>,
}

impl FileFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locations against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        let path = PathBuf::from(location);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        }
    }
}

#[async_trait]
impl ContentFetcher for FileFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.resolve(location);
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FetchError::NotFound {
                location: location.to_string(),
            },
            _ => FetchError::Io {
                location: location.to_string(),
                message: e.to_string(),
            },
        })
    }
}

/// Fetches essays over HTTP; any non-success status is an error
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            location: location.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(location).send().await.map_err(transport)?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                location: location.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}

/// Dispatches to HTTP for http(s) URLs and to the filesystem otherwise
#[derive(Debug, Clone, Default)]
pub struct SourceFetcher {
    file: FileFetcher,
    http: HttpFetcher,
}

impl SourceFetcher {
    pub fn new(file: FileFetcher, http: HttpFetcher) -> Self {
        Self { file, http }
    }
}

#[async_trait]
impl ContentFetcher for SourceFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        if is_remote_location(location) {
            self.http.fetch(location).await
        } else {
            self.file.fetch(location).await
        }
    }
}

/// Serves documents from memory, keyed by location
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    documents: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, location: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(location, content);
        self
    }

    pub fn insert(&mut self, location: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.documents.insert(location.into(), content.into());
    }
}

#[async_trait]
impl ContentFetcher for MemoryFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        self.documents
            .get(location)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                location: location.to_string(),
            })
    }
}

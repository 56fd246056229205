use crate::catalog::{CatalogProvider, DirectoryCatalog, ManifestCatalog};
use crate::content::{ContentLoader, MarkdownRenderer, SourceFetcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Reader configuration, loaded from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub site: SiteConfig,
    pub render: RenderConfig,
    pub fetch: FetchConfig,
    pub logging: LoggingConfig,
}

/// Where the essay catalog comes from. A manifest wins over a directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub directory: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            directory: Some(PathBuf::from("essays")),
            manifest: None,
        }
    }
}

/// Text shown around the essay list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub heading: String,
    pub intro: Vec<String>,
    pub footer: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            heading: "essays".to_string(),
            intro: vec!["notes on what i'm reading, and how it applies.".to_string()],
            footer: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Sanitize rendered HTML with ammonia
    pub sanitize: bool,
    pub smart_punctuation: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sanitize: false,
            smart_punctuation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file for the interactive reader
    pub file: PathBuf,
    /// One of trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("quire.log"),
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> tracing::Level {
        self.level.parse().unwrap_or(tracing::Level::INFO)
    }
}

impl Config {
    /// Default location: `<config dir>/quire/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("quire").join("config.toml"))
    }

    /// Load from an explicit path, or from the default path if it exists.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override the catalog source; a manifest takes precedence
    pub fn with_catalog_overrides(mut self, directory: Option<PathBuf>, manifest: Option<PathBuf>) -> Self {
        if let Some(manifest) = manifest {
            self.catalog.manifest = Some(manifest);
        } else if let Some(directory) = directory {
            self.catalog.directory = Some(directory);
            self.catalog.manifest = None;
        }
        self
    }

    /// Build the configured catalog provider
    pub fn catalog_provider(&self) -> Box<dyn CatalogProvider> {
        match (&self.catalog.manifest, &self.catalog.directory) {
            (Some(manifest), _) => Box::new(ManifestCatalog::new(manifest)),
            (None, Some(directory)) => Box::new(DirectoryCatalog::new(directory)),
            (None, None) => Box::new(DirectoryCatalog::new("essays")),
        }
    }

    /// Build the loader used for essay content: files and http(s) sources,
    /// rendered with the configured markdown options
    pub fn content_loader(&self) -> ContentLoader {
        let renderer = MarkdownRenderer::new()
            .with_smart_punctuation(self.render.smart_punctuation)
            .with_sanitize(self.render.sanitize);
        ContentLoader::new(Arc::new(SourceFetcher::default()), Arc::new(renderer))
            .with_timeout(self.fetch.timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
[site]
heading = "hi, i am hamza."
intro = ["a startup founder."]

[fetch]
timeout_secs = 3
"#,
        )
        .unwrap();

        assert_eq!(config.site.heading, "hi, i am hamza.");
        assert!(config.site.footer.is_empty());
        assert_eq!(config.fetch.timeout(), Duration::from_secs(3));
        assert_eq!(config.catalog, CatalogConfig::default());
        assert!(config.render.smart_punctuation);
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(include_str!("../quire.example.toml")).unwrap();

        assert_eq!(config.site.heading, "hi, i am hamza.");
        assert_eq!(config.site.intro.len(), 3);
        assert_eq!(config.site.footer.len(), 3);
        assert_eq!(config.catalog, CatalogConfig::default());
        assert_eq!(config.fetch, FetchConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[fetch]\ntimeout_secs = \"soon\"").unwrap();

        assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_catalog_overrides() {
        let config = Config::default()
            .with_catalog_overrides(Some(PathBuf::from("posts")), None);
        assert_eq!(config.catalog.directory, Some(PathBuf::from("posts")));
        assert_eq!(config.catalog.manifest, None);

        let config = config.with_catalog_overrides(None, Some(PathBuf::from("essays.toml")));
        assert_eq!(config.catalog.manifest, Some(PathBuf::from("essays.toml")));
    }

    #[test]
    fn test_content_loader_uses_fetch_timeout() {
        let mut config = Config::default();
        config.fetch.timeout_secs = 4;
        assert_eq!(config.content_loader().timeout(), Duration::from_secs(4));
    }

    #[test]
    fn test_log_level_parsing() {
        let mut logging = LoggingConfig::default();
        assert_eq!(logging.max_level(), tracing::Level::INFO);
        logging.level = "debug".to_string();
        assert_eq!(logging.max_level(), tracing::Level::DEBUG);
        logging.level = "chatty".to_string();
        assert_eq!(logging.max_level(), tracing::Level::INFO);
    }
}

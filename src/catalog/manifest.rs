use super::{Catalog, CatalogError, CatalogProvider, CatalogResult, EssayDescriptor};
use crate::content::is_remote_location;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Hand-authored catalog stored as TOML:
///
/// ```toml
/// [[essays]]
/// title = "How to Start a Startup"
/// identifier = "1.how_to_start_a_startup.md"
/// location = "essays/1.how_to_start_a_startup.md"
/// ```
///
/// Relative file locations are resolved against the manifest's directory.
#[derive(Debug, Clone)]
pub struct ManifestCatalog {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    essays: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    title: String,
    identifier: String,
    location: String,
}

impl ManifestCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse manifest text; `base` anchors relative locations
    pub fn parse(text: &str, base: &Path) -> Result<Vec<EssayDescriptor>, toml::de::Error> {
        let manifest: Manifest = toml::from_str(text)?;
        Ok(manifest
            .essays
            .into_iter()
            .map(|entry| EssayDescriptor {
                title: entry.title,
                identifier: entry.identifier,
                content_location: resolve_location(&entry.location, base),
            })
            .collect())
    }
}

impl CatalogProvider for ManifestCatalog {
    fn load(&self) -> CatalogResult<Catalog> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        let base = self.path.parent().unwrap_or_else(|| Path::new(""));
        let essays = Self::parse(&text, base).map_err(|source| CatalogError::Manifest {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!("Loaded {} essays from manifest {}", essays.len(), self.path.display());
        Catalog::new(essays)
    }
}

fn resolve_location(location: &str, base: &Path) -> String {
    if is_remote_location(location) || Path::new(location).is_absolute() {
        location.to_string()
    } else {
        base.join(location).to_string_lossy().into_owned()
    }
}

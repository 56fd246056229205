pub mod directory;
pub mod manifest;

pub use directory::DirectoryCatalog;
pub use manifest::ManifestCatalog;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Catalog loading and validation errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Duplicate essay identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("Identifier is not URL-path safe: {0:?}")]
    UnsafeIdentifier(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Static metadata for one essay in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssayDescriptor {
    pub title: String,
    /// Unique key, also used as the URL slug
    pub identifier: String,
    /// Where the markdown source can be fetched from (file path or http(s) URL)
    pub content_location: String,
}

impl EssayDescriptor {
    pub fn new(
        title: impl Into<String>,
        identifier: impl Into<String>,
        content_location: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            identifier: identifier.into(),
            content_location: content_location.into(),
        }
    }
}

/// Ordered, identifier-indexed collection of essays.
///
/// Order is display order. Identifiers are unique and URL-path safe; both
/// are checked once at construction so lookups never need to revalidate.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    essays: Vec<EssayDescriptor>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(essays: Vec<EssayDescriptor>) -> CatalogResult<Self> {
        let mut index = HashMap::with_capacity(essays.len());
        for (position, essay) in essays.iter().enumerate() {
            if !is_path_safe(&essay.identifier) {
                return Err(CatalogError::UnsafeIdentifier(essay.identifier.clone()));
            }
            if index.insert(essay.identifier.clone(), position).is_some() {
                return Err(CatalogError::DuplicateIdentifier(essay.identifier.clone()));
            }
        }
        Ok(Self { essays, index })
    }

    pub fn get(&self, identifier: &str) -> Option<&EssayDescriptor> {
        self.index.get(identifier).map(|&i| &self.essays[i])
    }

    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.index.get(identifier).copied()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    pub fn essays(&self) -> &[EssayDescriptor] {
        &self.essays
    }

    pub fn iter(&self) -> impl Iterator<Item = &EssayDescriptor> {
        self.essays.iter()
    }

    pub fn len(&self) -> usize {
        self.essays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.essays.is_empty()
    }
}

/// Source of the essay catalog, consulted once at startup
pub trait CatalogProvider {
    fn load(&self) -> CatalogResult<Catalog>;
}

/// Hand-built catalog held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog(pub Vec<EssayDescriptor>);

impl CatalogProvider for StaticCatalog {
    fn load(&self) -> CatalogResult<Catalog> {
        Catalog::new(self.0.clone())
    }
}

/// Unreserved URL characters only, and never a dot segment.
pub fn is_path_safe(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier != "."
        && identifier != ".."
        && identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~'))
}

/// Derive a display title from an essay file name.
///
/// Drops the `.md` extension, turns `_` and `-` into spaces and capitalizes
/// the first character of every word, so `1.how_to_start_a_startup.md`
/// becomes `1.How To Start A Startup`.
pub fn title_from_file_name(file_name: &str) -> String {
    static WORD_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w").unwrap());

    let base = file_name.strip_suffix(".md").unwrap_or(file_name);
    let spaced = base.replace(|c: char| c == '_' || c == '-', " ");

    WORD_START
        .replace_all(&spaced, |caps: &regex::Captures| caps[0].to_uppercase())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn essay(identifier: &str) -> EssayDescriptor {
        EssayDescriptor::new(identifier.to_uppercase(), identifier, format!("/tmp/{}", identifier))
    }

    #[test]
    fn test_catalog_lookup_preserves_order() {
        let catalog = Catalog::new(vec![essay("b.md"), essay("a.md")]).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.essays()[0].identifier, "b.md");
        assert_eq!(catalog.position("a.md"), Some(1));
        assert_eq!(catalog.get("a.md").unwrap().content_location, "/tmp/a.md");
        assert!(catalog.get("c.md").is_none());
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let result = Catalog::new(vec![essay("a.md"), essay("a.md")]);
        assert!(matches!(result, Err(CatalogError::DuplicateIdentifier(id)) if id == "a.md"));
    }

    #[test]
    fn test_unsafe_identifier_rejected() {
        for bad in ["", "..", "a/b.md", "with space.md", "q?.md", "50%.md"] {
            let result = Catalog::new(vec![essay(bad)]);
            assert!(
                matches!(result, Err(CatalogError::UnsafeIdentifier(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_path_safe_identifiers() {
        assert!(is_path_safe("1.how_to_start_a_startup.md"));
        assert!(is_path_safe("great-work~v2"));
        assert!(!is_path_safe("."));
    }

    #[test]
    fn test_title_from_file_name() {
        assert_eq!(
            title_from_file_name("1.how_to_start_a_startup.md"),
            "1.How To Start A Startup"
        );
        assert_eq!(title_from_file_name("do-things_that-dont-scale.md"), "Do Things That Dont Scale");
        assert_eq!(title_from_file_name("notes"), "Notes");
    }

    #[test]
    fn test_static_catalog_provider() {
        let provider = StaticCatalog(vec![essay("x.md")]);
        let catalog = provider.load().unwrap();
        assert!(catalog.contains("x.md"));
    }
}

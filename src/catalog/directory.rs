use super::{title_from_file_name, Catalog, CatalogError, CatalogProvider, CatalogResult, EssayDescriptor};
use std::path::{Path, PathBuf};

/// Catalog built by scanning a directory for `*.md` files.
///
/// Files are listed in file-name order, which lets authors control display
/// order with numeric prefixes (`1.foo.md`, `2.bar.md`).
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    dir: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CatalogProvider for DirectoryCatalog {
    fn load(&self) -> CatalogResult<Catalog> {
        if !self.dir.is_dir() {
            return Err(CatalogError::Io {
                path: self.dir.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            });
        }

        let pattern = format!("{}/*.md", glob::Pattern::escape(&self.dir.to_string_lossy()));
        let mut files: Vec<PathBuf> = glob::glob(&pattern)?
            .filter_map(|entry| match entry {
                Ok(path) if path.is_file() => Some(path),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("Skipping unreadable catalog entry: {}", e);
                    None
                }
            })
            .collect();
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let essays = files
            .into_iter()
            .filter_map(|path| {
                let file_name = path.file_name()?.to_str()?.to_string();
                Some(EssayDescriptor {
                    title: title_from_file_name(&file_name),
                    identifier: file_name,
                    content_location: path.to_string_lossy().into_owned(),
                })
            })
            .collect::<Vec<_>>();

        tracing::debug!("Found {} essays in {}", essays.len(), self.dir.display());
        Catalog::new(essays)
    }
}

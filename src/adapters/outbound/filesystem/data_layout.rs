use crate::shared::error::CatalogError;
use crate::shared::Result;
use std::path::{Path, PathBuf};

/// Directory conventions under the data root.
///
/// ```text
/// data/
///   metaobjects/{type_plural}.json
///   products/{brand}.json, products/index.json
///   cache/templates.json
///   missing/missing_metaobjects.json
///   analysis/<job>.json, analysis/<job>.md
///   backups/<stem>_<timestamp>.json
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Like `new`, but fails unless `root` is an existing directory.
    pub fn existing(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(CatalogError::InvalidDataDir {
                path: root,
                reason: "directory does not exist".to_string(),
            }
            .into());
        }
        if !root.is_dir() {
            return Err(CatalogError::InvalidDataDir {
                path: root,
                reason: "not a directory".to_string(),
            }
            .into());
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn metaobjects_dir(&self) -> PathBuf {
        self.root.join("metaobjects")
    }

    pub fn products_dir(&self) -> PathBuf {
        self.root.join("products")
    }

    pub fn template_cache_file(&self) -> PathBuf {
        self.root.join("cache").join("templates.json")
    }

    pub fn missing_log_file(&self) -> PathBuf {
        self.root.join("missing").join("missing_metaobjects.json")
    }

    pub fn analysis_dir(&self) -> PathBuf {
        self.root.join("analysis")
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.root.join("backups")
    }
}

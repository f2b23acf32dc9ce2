use crate::catalog::services::TemplateGenerator;
use crate::ports::outbound::{SpecificationRepository, TemplateRepository};
use crate::shared::fs::{modified_time, read_json, write_json};
use crate::shared::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const CACHE_FORMAT_VERSION: &str = "2";

#[derive(Debug, Serialize, Deserialize)]
struct SourceFileStamp {
    path: PathBuf,
    #[serde(default)]
    modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TemplateCacheFile {
    generated_at: DateTime<Utc>,
    total_templates: usize,
    templates: Vec<String>,
    version: String,
    #[serde(default)]
    source_files: Vec<SourceFileStamp>,
}

/// The part of the cache file staleness checks need.
#[derive(Debug, Deserialize)]
struct CacheSources {
    #[serde(default)]
    source_files: Vec<SourceFileStamp>,
}

fn file_names<'p>(paths: impl Iterator<Item = &'p Path>) -> BTreeSet<OsString> {
    paths
        .filter_map(|path| path.file_name().map(OsString::from))
        .collect()
}

/// FileTemplateCache adapter persisting every generated template to one file
///
/// The cache is stale when its file is absent, when any brand file is newer
/// than it, or when brand files were added or removed since it was written
/// (the file records the sources it was generated from). Regeneration is always
/// total. Failing to write the cache file is logged and otherwise ignored;
/// the freshly generated templates are still returned.
pub struct FileTemplateCache<S: SpecificationRepository> {
    specs: S,
    path: PathBuf,
    loaded: RefCell<Option<Vec<String>>>,
}

impl<S: SpecificationRepository> FileTemplateCache<S> {
    pub fn new(specs: S, path: impl Into<PathBuf>) -> Self {
        Self {
            specs,
            path: path.into(),
            loaded: RefCell::new(None),
        }
    }

    fn persist(&self, templates: &[String], sources: &[PathBuf]) {
        let file = TemplateCacheFile {
            generated_at: Utc::now(),
            total_templates: templates.len(),
            templates: templates.to_vec(),
            version: CACHE_FORMAT_VERSION.to_string(),
            source_files: sources
                .iter()
                .map(|path| SourceFileStamp {
                    path: path.clone(),
                    modified_at: modified_time(path).map(DateTime::<Utc>::from),
                })
                .collect(),
        };
        if let Err(e) = write_json(&self.path, &file) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "could not write template cache; continuing with in-memory templates"
            );
        }
    }

    fn read_cache_file(&self) -> Option<Vec<String>> {
        match read_json::<TemplateCacheFile>(&self.path) {
            Ok(Some(file)) if file.version == CACHE_FORMAT_VERSION => Some(file.templates),
            Ok(Some(file)) => {
                tracing::info!(version = %file.version, "template cache format changed");
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "template cache unreadable, regenerating");
                None
            }
        }
    }
}

impl<S: SpecificationRepository> TemplateRepository for FileTemplateCache<S> {
    fn get_all_templates(&self) -> Result<Vec<String>> {
        if self.needs_regeneration() {
            return self.regenerate_cache();
        }
        if let Some(templates) = self.loaded.borrow().as_ref() {
            return Ok(templates.clone());
        }
        match self.read_cache_file() {
            Some(templates) => {
                *self.loaded.borrow_mut() = Some(templates.clone());
                Ok(templates)
            }
            None => self.regenerate_cache(),
        }
    }

    fn needs_regeneration(&self) -> bool {
        let Some(cache_time) = modified_time(&self.path) else {
            return true;
        };
        let sources = match self.specs.source_files() {
            Ok(sources) => sources,
            Err(e) => {
                tracing::warn!(error = %e, "could not list specification files");
                return true;
            }
        };
        if sources.iter().any(|source| {
            modified_time(source).map_or(true, |t: SystemTime| t > cache_time)
        }) {
            return true;
        }

        let recorded = match read_json::<CacheSources>(&self.path) {
            Ok(Some(file)) => file_names(file.source_files.iter().map(|s| s.path.as_path())),
            Ok(None) => return true,
            Err(e) => {
                tracing::debug!(error = %e, "template cache unreadable");
                return true;
            }
        };
        let changed = recorded != file_names(sources.iter().map(PathBuf::as_path));
        if changed {
            tracing::debug!("brand files added or removed since the template cache was written");
        }
        changed
    }

    fn regenerate_cache(&self) -> Result<Vec<String>> {
        self.specs.clear_cache();
        let loaded = self.specs.load_all()?;
        let brands: Vec<_> = loaded.brands.iter().map(|b| (**b).clone()).collect();
        let templates = TemplateGenerator::generate(&brands);
        tracing::info!(
            templates = templates.len(),
            brands = brands.len(),
            skipped = loaded.skipped.len(),
            "regenerated template cache"
        );

        let sources = self.specs.source_files()?;
        self.persist(&templates, &sources);
        *self.loaded.borrow_mut() = Some(templates.clone());
        Ok(templates)
    }

    fn clear_cache(&self) {
        *self.loaded.borrow_mut() = None;
    }
}

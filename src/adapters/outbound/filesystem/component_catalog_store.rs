use crate::catalog::domain::{ComponentMapping, ComponentType};
use crate::ports::outbound::{ComponentCatalog, ComponentCatalogWriter};
use crate::shared::fs::{read_json, read_source, write_atomic, write_json};
use crate::shared::Result;
use chrono::Utc;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// FileComponentCatalog adapter backed by one JSON object per component type
///
/// Each `metaobjects/{type_plural}.json` file maps full display names to
/// remote identifiers. Mappings are loaded on first access and kept until
/// `clear_cache`; `write_mapping` does not refresh the cache, so a job that
/// writes must clear it before reading its own changes back.
pub struct FileComponentCatalog {
    dir: PathBuf,
    backups_dir: PathBuf,
    cache: DashMap<ComponentType, Arc<ComponentMapping>>,
}

impl FileComponentCatalog {
    pub fn new(dir: impl Into<PathBuf>, backups_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            backups_dir: backups_dir.into(),
            cache: DashMap::new(),
        }
    }

    pub fn path_for(&self, component_type: ComponentType) -> PathBuf {
        self.dir.join(format!("{}.json", component_type.file_stem()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[cfg(test)]
    fn cached_types(&self) -> usize {
        self.cache.len()
    }
}

impl ComponentCatalog for FileComponentCatalog {
    fn get_mapping(&self, component_type: ComponentType) -> Result<Arc<ComponentMapping>> {
        if let Some(cached) = self.cache.get(&component_type) {
            return Ok(Arc::clone(cached.value()));
        }

        let path = self.path_for(component_type);
        let mapping: ComponentMapping = read_json(&path)?.unwrap_or_default();
        tracing::debug!(
            component_type = %component_type,
            entries = mapping.len(),
            "loaded component mapping"
        );

        let mapping = Arc::new(mapping);
        self.cache.insert(component_type, Arc::clone(&mapping));
        Ok(mapping)
    }

    fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl ComponentCatalogWriter for FileComponentCatalog {
    fn backup(&self, component_type: ComponentType) -> Result<Option<PathBuf>> {
        let source = self.path_for(component_type);
        let Some(content) = read_source(&source)? else {
            return Ok(None);
        };

        let stamp = Utc::now().format("%Y%m%d_%H%M%S_%3f");
        let target = self
            .backups_dir
            .join(format!("{}_{}.json", component_type.file_stem(), stamp));
        write_atomic(&target, &content)?;
        tracing::info!(backup = %target.display(), "backed up component mapping");
        Ok(Some(target))
    }

    fn write_mapping(
        &self,
        component_type: ComponentType,
        mapping: &ComponentMapping,
    ) -> Result<()> {
        write_json(&self.path_for(component_type), mapping)
    }
}

use crate::catalog::domain::BrandCatalog;
use crate::ports::outbound::SpecificationRepository;
use crate::shared::error::CatalogError;
use crate::shared::fs::{read_json, write_json};
use crate::shared::Result;
use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// File stems in the products directory that are not brand catalogs.
const NON_BRAND_STEMS: &[&str] = &["index"];

const INDEX_FILE: &str = "index.json";

#[derive(Debug, Serialize)]
struct BrandIndex {
    generated_at: String,
    total_brands: usize,
    total_models: usize,
    brands: Vec<BrandIndexEntry>,
}

#[derive(Debug, Serialize)]
struct BrandIndexEntry {
    key: String,
    brand: String,
    file: String,
    model_count: usize,
    configuration_count: usize,
}

/// FileSpecificationStore adapter reading one `products/{brand}.json` per brand
///
/// Brand catalogs are cached after first load. A brand whose file fails to
/// parse is never cached, so fixing the file on disk is picked up by the
/// next call.
pub struct FileSpecificationStore {
    dir: PathBuf,
    cache: DashMap<String, Arc<BrandCatalog>>,
}

impl FileSpecificationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: DashMap::new(),
        }
    }

    fn brand_path(&self, brand: &str) -> Result<PathBuf> {
        if brand.is_empty() || brand.contains(['/', '\\']) || brand.starts_with('.') {
            return Err(CatalogError::Validation {
                message: format!("'{}' is not a valid brand name", brand),
            }
            .into());
        }
        Ok(self.dir.join(format!("{}.json", brand)))
    }

    fn is_brand_stem(stem: &str) -> bool {
        !stem.is_empty()
            && !stem.starts_with(['_', '.'])
            && !NON_BRAND_STEMS.contains(&stem.to_lowercase().as_str())
    }
}

impl SpecificationRepository for FileSpecificationStore {
    fn get_brand_data(&self, brand: &str) -> Result<Option<Arc<BrandCatalog>>> {
        let brand = brand.trim();
        if let Some(cached) = self.cache.get(brand) {
            return Ok(Some(Arc::clone(cached.value())));
        }

        let mut path = self.brand_path(brand)?;
        if !path.exists() {
            path = self.brand_path(&brand.to_lowercase())?;
        }
        let Some(catalog) = read_json::<BrandCatalog>(&path)? else {
            return Ok(None);
        };

        let catalog = Arc::new(catalog);
        self.cache.insert(brand.to_string(), Arc::clone(&catalog));
        Ok(Some(catalog))
    }

    fn get_all_brands(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CatalogError::FileReadError {
                    path: self.dir.clone(),
                    details: e.to_string(),
                }
                .into())
            }
        };

        let mut brands: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
            .filter(|stem| Self::is_brand_stem(stem))
            .collect();
        brands.sort();
        brands.dedup();
        Ok(brands)
    }

    fn source_files(&self) -> Result<Vec<PathBuf>> {
        self.get_all_brands()?
            .iter()
            .map(|brand| self.brand_path(brand))
            .collect()
    }

    fn write_index(&self) -> Result<PathBuf> {
        let mut brands = Vec::new();
        for key in self.get_all_brands()? {
            let catalog = match self.get_brand_data(&key) {
                Ok(Some(catalog)) => catalog,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(brand = %key, error = %e, "leaving brand out of index");
                    continue;
                }
            };
            brands.push(BrandIndexEntry {
                file: format!("{}.json", key),
                key,
                brand: catalog.brand.clone(),
                model_count: catalog.models.len(),
                configuration_count: catalog
                    .models
                    .values()
                    .map(|m| m.configurations.len())
                    .sum(),
            });
        }

        let index = BrandIndex {
            generated_at: Utc::now().to_rfc3339(),
            total_brands: brands.len(),
            total_models: brands.iter().map(|b| b.model_count).sum(),
            brands,
        };
        let path = self.dir.join(INDEX_FILE);
        write_json(&path, &index)?;
        Ok(path)
    }

    fn clear_cache(&self) {
        self.cache.clear();
    }
}

use crate::catalog::domain::{BrandCatalog, LegacyModelView, ProductModel};
use crate::catalog::services::{SpecValidationReport, SpecValidator};
use crate::shared::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Every brand that loaded, plus the names of those that did not.
#[derive(Debug, Clone, Default)]
pub struct LoadedBrands {
    pub brands: Vec<Arc<BrandCatalog>>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpecCounts {
    pub brands: usize,
    pub models: usize,
    pub configurations: usize,
}

/// SpecificationRepository port for per-brand product catalogs
///
/// Only `get_brand_data`, `get_all_brands`, `source_files`, `write_index`
/// and `clear_cache` touch storage; the aggregate helpers are derived from
/// `load_all`.
pub trait SpecificationRepository {
    /// Loads one brand catalog
    ///
    /// # Returns
    /// `Ok(None)` if the brand has no backing store.
    ///
    /// # Errors
    /// Returns `CatalogError::MalformedSource` if the store cannot be parsed.
    fn get_brand_data(&self, brand: &str) -> Result<Option<Arc<BrandCatalog>>>;

    /// Brand names derived from the backing stores, excluding index artifacts
    fn get_all_brands(&self) -> Result<Vec<String>>;

    /// Backing files whose modification times drive template-cache staleness
    fn source_files(&self) -> Result<Vec<PathBuf>>;

    /// Rewrites the brand index with per-brand model counts
    fn write_index(&self) -> Result<PathBuf>;

    fn clear_cache(&self);

    /// Loads every brand, skipping (with a warning) any that fail to load
    fn load_all(&self) -> Result<LoadedBrands> {
        let mut loaded = LoadedBrands::default();
        for brand in self.get_all_brands()? {
            match self.get_brand_data(&brand) {
                Ok(Some(catalog)) => loaded.brands.push(catalog),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(brand = %brand, error = %e, "skipping brand that failed to load");
                    loaded.skipped.push(brand);
                }
            }
        }
        Ok(loaded)
    }

    /// Every model across all loadable brands, keyed by model key
    fn get_all_models(&self) -> Result<BTreeMap<String, ProductModel>> {
        let mut models = BTreeMap::new();
        for catalog in self.load_all()?.brands {
            for (key, model) in &catalog.models {
                if models.insert(key.clone(), model.clone()).is_some() {
                    tracing::warn!(model = %key, brand = %catalog.brand, "model key defined by more than one brand");
                }
            }
        }
        Ok(models)
    }

    /// Single-configuration view of every model (lossy, read-only)
    fn legacy_models(&self) -> Result<BTreeMap<String, LegacyModelView>> {
        let mut views = BTreeMap::new();
        for catalog in self.load_all()?.brands {
            for (key, model) in &catalog.models {
                views.insert(key.clone(), LegacyModelView::new(&catalog.brand, key, model));
            }
        }
        Ok(views)
    }

    /// Model keys containing `term` (case-insensitive), optionally within one brand
    fn search_models(&self, term: &str, brand: Option<&str>) -> Result<Vec<String>> {
        let needle = term.trim().to_lowercase();
        let catalogs = match brand {
            Some(name) => self.get_brand_data(name)?.into_iter().collect(),
            None => self.load_all()?.brands,
        };
        let mut matches: Vec<String> = catalogs
            .iter()
            .flat_map(|c| c.models.keys())
            .filter(|key| key.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort();
        matches.dedup();
        Ok(matches)
    }

    fn counts(&self) -> Result<SpecCounts> {
        let loaded = self.load_all()?;
        let models = loaded.brands.iter().flat_map(|c| c.models.values());
        Ok(SpecCounts {
            brands: loaded.brands.len(),
            models: models.clone().count(),
            configurations: models.map(|m| m.configurations.len()).sum(),
        })
    }

    fn validate(&self) -> Result<SpecValidationReport> {
        let loaded = self.load_all()?;
        let brands: Vec<BrandCatalog> = loaded.brands.iter().map(|c| (**c).clone()).collect();
        let mut report = SpecValidator::validate(&brands);
        for brand in loaded.skipped {
            report.errors.insert(0, format!("{}: backing file failed to load", brand));
        }
        Ok(report)
    }
}

impl<T: SpecificationRepository + ?Sized> SpecificationRepository for &T {
    fn get_brand_data(&self, brand: &str) -> Result<Option<Arc<BrandCatalog>>> {
        (**self).get_brand_data(brand)
    }

    fn get_all_brands(&self) -> Result<Vec<String>> {
        (**self).get_all_brands()
    }

    fn source_files(&self) -> Result<Vec<PathBuf>> {
        (**self).source_files()
    }

    fn write_index(&self) -> Result<PathBuf> {
        (**self).write_index()
    }

    fn clear_cache(&self) {
        (**self).clear_cache()
    }
}

impl<T: SpecificationRepository + ?Sized> SpecificationRepository for Arc<T> {
    fn get_brand_data(&self, brand: &str) -> Result<Option<Arc<BrandCatalog>>> {
        (**self).get_brand_data(brand)
    }

    fn get_all_brands(&self) -> Result<Vec<String>> {
        (**self).get_all_brands()
    }

    fn source_files(&self) -> Result<Vec<PathBuf>> {
        (**self).source_files()
    }

    fn write_index(&self) -> Result<PathBuf> {
        (**self).write_index()
    }

    fn clear_cache(&self) {
        (**self).clear_cache()
    }
}

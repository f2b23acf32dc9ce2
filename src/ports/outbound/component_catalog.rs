use crate::catalog::domain::{ComponentMapping, ComponentType};
use crate::shared::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// ComponentCatalog port for full-name → remote-identifier lookups
///
/// Implementations load each type's backing store lazily, at most once per
/// cache lifetime, and keep it until `clear_cache` is called.
pub trait ComponentCatalog {
    /// Returns the full mapping for one component type
    ///
    /// A type with no backing store yet yields an empty mapping.
    ///
    /// # Errors
    /// Returns `CatalogError::MalformedSource` if the backing store exists
    /// but cannot be parsed.
    fn get_mapping(&self, component_type: ComponentType) -> Result<Arc<ComponentMapping>>;

    /// Looks up the remote identifier for an exact full name
    ///
    /// # Returns
    /// `Ok(None)` when the name is unmapped. That is a routine outcome,
    /// never an error.
    fn get_id(&self, component_type: ComponentType, full_name: &str) -> Result<Option<String>> {
        Ok(self.get_mapping(component_type)?.get(full_name).cloned())
    }

    fn get_all_types(&self) -> Vec<ComponentType> {
        ComponentType::ALL.to_vec()
    }

    /// Drops every cached mapping; the next lookup reloads from storage.
    fn clear_cache(&self);
}

/// ComponentCatalogWriter port for reconciliation jobs that mutate the catalog
pub trait ComponentCatalogWriter {
    /// Copies the current backing store of `component_type` to a timestamped
    /// backup file
    ///
    /// # Returns
    /// The backup path, or `None` when there was nothing to back up.
    fn backup(&self, component_type: ComponentType) -> Result<Option<PathBuf>>;

    /// Replaces the backing store of `component_type` with `mapping`
    fn write_mapping(&self, component_type: ComponentType, mapping: &ComponentMapping)
        -> Result<()>;
}

impl<T: ComponentCatalog + ?Sized> ComponentCatalog for &T {
    fn get_mapping(&self, component_type: ComponentType) -> Result<Arc<ComponentMapping>> {
        (**self).get_mapping(component_type)
    }

    fn get_id(&self, component_type: ComponentType, full_name: &str) -> Result<Option<String>> {
        (**self).get_id(component_type, full_name)
    }

    fn clear_cache(&self) {
        (**self).clear_cache()
    }
}

impl<T: ComponentCatalogWriter + ?Sized> ComponentCatalogWriter for &T {
    fn backup(&self, component_type: ComponentType) -> Result<Option<PathBuf>> {
        (**self).backup(component_type)
    }

    fn write_mapping(
        &self,
        component_type: ComponentType,
        mapping: &ComponentMapping,
    ) -> Result<()> {
        (**self).write_mapping(component_type, mapping)
    }
}

use crate::shared::Result;

/// TemplateRepository port for the derived template cache
pub trait TemplateRepository {
    /// Returns every template, regenerating first if the cache is stale
    fn get_all_templates(&self) -> Result<Vec<String>>;

    /// True if the cache file is absent or any source is newer than it
    fn needs_regeneration(&self) -> bool;

    /// Recomputes every template and rewrites the cache file
    ///
    /// # Returns
    /// The regenerated templates, sorted.
    fn regenerate_cache(&self) -> Result<Vec<String>>;

    fn clear_cache(&self);

    /// Templates containing `term`, case-insensitive
    fn search(&self, term: &str) -> Result<Vec<String>> {
        let needle = term.trim().to_lowercase();
        Ok(self
            .get_all_templates()?
            .into_iter()
            .filter(|t| t.to_lowercase().contains(&needle))
            .collect())
    }
}

impl<T: TemplateRepository + ?Sized> TemplateRepository for &T {
    fn get_all_templates(&self) -> Result<Vec<String>> {
        (**self).get_all_templates()
    }

    fn needs_regeneration(&self) -> bool {
        (**self).needs_regeneration()
    }

    fn regenerate_cache(&self) -> Result<Vec<String>> {
        (**self).regenerate_cache()
    }

    fn clear_cache(&self) {
        (**self).clear_cache()
    }
}

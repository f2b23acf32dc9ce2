use crate::adapters::outbound::console::StderrProgressReporter;
use crate::adapters::outbound::filesystem::{
    DataLayout, FileComponentCatalog, FileMissingEntryLog, FileReportWriter,
    FileSpecificationStore, FileTemplateCache,
};
use crate::adapters::outbound::formatters::MarkdownReportFormatter;
use crate::application::services::MissingEntryTracker;
use crate::application::use_cases::{
    AnalyzeGapsUseCase, AssembleMetafieldsUseCase, DecodeTemplateUseCase, PublishProductUseCase,
    ResolveMissingUseCase, ValidateCatalogUseCase,
};
use crate::catalog::policies::MatchPolicy;
use crate::catalog::services::CatalogValidator;
use crate::config::Settings;
use crate::ports::outbound::{
    ComponentCatalog, MetaobjectRepository, ProductRepository, SpecificationRepository,
    TemplateRepository,
};
use crate::shared::Result;
use std::sync::Arc;

type Specs = Arc<FileSpecificationStore>;
type Tracker = MissingEntryTracker<FileMissingEntryLog>;

/// AppContext - Long-lived owner of every store instance
///
/// Stores cache lazily and are shared by reference with the use cases
/// built from this context. Nothing is reloaded implicitly: call
/// [`AppContext::reload`] to observe files changed by another process.
pub struct AppContext {
    settings: Settings,
    layout: DataLayout,
    catalog: FileComponentCatalog,
    specs: Specs,
    templates: FileTemplateCache<Specs>,
    tracker: Tracker,
    formatter: MarkdownReportFormatter,
    reports: FileReportWriter,
    progress_reporter: StderrProgressReporter,
}

impl AppContext {
    /// Opens the data directory named by `settings`, which must exist.
    pub fn open(settings: Settings) -> Result<Self> {
        let layout = DataLayout::existing(&settings.data_dir)?;
        Ok(Self::with_layout(layout, settings))
    }

    pub fn with_layout(layout: DataLayout, settings: Settings) -> Self {
        let specs = Arc::new(FileSpecificationStore::new(layout.products_dir()));
        Self {
            catalog: FileComponentCatalog::new(layout.metaobjects_dir(), layout.backups_dir()),
            templates: FileTemplateCache::new(Arc::clone(&specs), layout.template_cache_file()),
            tracker: MissingEntryTracker::new(FileMissingEntryLog::new(layout.missing_log_file())),
            formatter: MarkdownReportFormatter::new(),
            reports: FileReportWriter::new(layout.analysis_dir()),
            progress_reporter: StderrProgressReporter::new(),
            specs,
            layout,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    pub fn catalog(&self) -> &FileComponentCatalog {
        &self.catalog
    }

    pub fn specs(&self) -> &FileSpecificationStore {
        &self.specs
    }

    pub fn templates(&self) -> &FileTemplateCache<Specs> {
        &self.templates
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn formatter(&self) -> &MarkdownReportFormatter {
        &self.formatter
    }

    pub fn match_policy(&self) -> MatchPolicy {
        MatchPolicy::new(self.settings.partial_match_threshold)
    }

    /// Drops every in-memory cache; the next access re-reads from disk.
    pub fn reload(&self) {
        self.catalog.clear_cache();
        self.specs.clear_cache();
        self.templates.clear_cache();
        self.tracker.reload();
        tracing::debug!(root = %self.layout.root().display(), "caches cleared");
    }

    pub fn decode_template(&self) -> DecodeTemplateUseCase<&FileSpecificationStore> {
        DecodeTemplateUseCase::new(self.specs(), self.match_policy())
    }

    pub fn assemble_metafields(&self) -> AssembleMetafieldsUseCase<&FileComponentCatalog, &Tracker> {
        AssembleMetafieldsUseCase::new(&self.catalog, &self.tracker)
    }

    pub fn publish_product<P: ProductRepository>(
        &self,
        products: P,
    ) -> PublishProductUseCase<'_, &FileSpecificationStore, &FileComponentCatalog, FileMissingEntryLog, P>
    {
        PublishProductUseCase::new(
            self.specs(),
            &self.catalog,
            &self.tracker,
            products,
            self.match_policy(),
        )
    }

    pub fn analyze_gaps(
        &self,
    ) -> AnalyzeGapsUseCase<
        &FileSpecificationStore,
        &FileComponentCatalog,
        &MarkdownReportFormatter,
        &FileReportWriter,
        &StderrProgressReporter,
    > {
        AnalyzeGapsUseCase::new(
            self.specs(),
            &self.catalog,
            &self.formatter,
            &self.reports,
            &self.progress_reporter,
        )
    }

    pub fn resolve_missing<R: MetaobjectRepository>(
        &self,
        metaobjects: R,
    ) -> ResolveMissingUseCase<
        '_,
        &FileSpecificationStore,
        &FileComponentCatalog,
        R,
        FileMissingEntryLog,
        &StderrProgressReporter,
        &MarkdownReportFormatter,
        &FileReportWriter,
    > {
        ResolveMissingUseCase::new(
            self.specs(),
            &self.catalog,
            metaobjects,
            &self.tracker,
            &self.progress_reporter,
            &self.formatter,
            &self.reports,
        )
    }

    pub fn validate_catalog(
        &self,
    ) -> ValidateCatalogUseCase<
        &FileSpecificationStore,
        &FileComponentCatalog,
        &MarkdownReportFormatter,
        &FileReportWriter,
    > {
        ValidateCatalogUseCase::new(
            self.specs(),
            &self.catalog,
            CatalogValidator::new(&self.settings.gid_prefix),
            &self.formatter,
            &self.reports,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::{ComponentMapping, ComponentType};
    use crate::ports::outbound::ComponentCatalogWriter;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_requires_existing_dir() {
        let settings = Settings {
            data_dir: "/nonexistent/catalog-data".into(),
            ..Settings::default()
        };
        assert!(AppContext::open(settings).is_err());
    }

    #[test]
    fn test_reload_makes_external_writes_visible() {
        let dir = TempDir::new().unwrap();
        let context = AppContext::with_layout(DataLayout::new(dir.path()), Settings::default());
        assert_eq!(
            context.catalog().get_id(ComponentType::Storage, "2TB SSD").unwrap(),
            None
        );

        let other = FileComponentCatalog::new(
            context.layout().metaobjects_dir(),
            context.layout().backups_dir(),
        );
        let mapping = ComponentMapping::from([(
            "2TB SSD".to_string(),
            "gid://shopify/Metaobject/123".to_string(),
        )]);
        other.write_mapping(ComponentType::Storage, &mapping).unwrap();

        assert_eq!(
            context.catalog().get_id(ComponentType::Storage, "2TB SSD").unwrap(),
            None
        );
        context.reload();
        assert_eq!(
            context.catalog().get_id(ComponentType::Storage, "2TB SSD").unwrap(),
            Some("gid://shopify/Metaobject/123".to_string())
        );
        assert!(fs::metadata(context.catalog().path_for(ComponentType::Storage)).is_ok());
    }
}

/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to reach storage, the remote catalog platform and the console.
pub mod component_catalog;
pub mod metaobject_repository;
pub mod missing_entry_store;
pub mod product_repository;
pub mod progress_reporter;
pub mod report_formatter;
pub mod report_writer;
pub mod specification_repository;
pub mod template_repository;

pub use component_catalog::{ComponentCatalog, ComponentCatalogWriter};
pub use metaobject_repository::{MetaobjectMatch, MetaobjectRepository};
pub use missing_entry_store::{MissingEntryRecorder, MissingEntryStore};
pub use product_repository::ProductRepository;
pub use progress_reporter::ProgressReporter;
pub use report_formatter::ReportFormatter;
pub use report_writer::{ReportPaths, ReportWriter};
pub use specification_repository::{LoadedBrands, SpecCounts, SpecificationRepository};
pub use template_repository::TemplateRepository;

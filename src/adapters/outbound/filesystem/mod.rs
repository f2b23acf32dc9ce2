/// Filesystem adapters for the JSON data directory
mod component_catalog_store;
mod data_layout;
mod missing_entry_log;
mod report_writer;
mod specification_store;
mod template_cache;

pub use component_catalog_store::FileComponentCatalog;
pub use data_layout::DataLayout;
pub use missing_entry_log::FileMissingEntryLog;
pub use report_writer::FileReportWriter;
pub use specification_store::FileSpecificationStore;
pub use template_cache::FileTemplateCache;

//! catalog-mapper - maps product templates to a remote catalog's structured attributes
//!
//! Operators enter products as short templates such as
//! `ASUS TUF F15 FX507ZV4 [i7-12700H/16GB/RTX 4060/144Hz/512GB] [Graphite Black]`.
//! This library decodes them against brand specification files, resolves
//! every component to a catalog metaobject identifier, records the values
//! the catalog does not know yet, and reconciles the catalog offline.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`catalog`): Value types, pure algorithms and policies
//! - **Application Layer** (`application`): Use cases, the missing-entry tracker and `AppContext`
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): JSON files, the GraphQL admin client, console and Markdown output
//! - **Shared** (`shared`): Errors, logging and atomic file helpers
//!
//! # Example
//!
//! ```no_run
//! use catalog_mapper::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let context = AppContext::open(Settings::default())?;
//!
//! let template = "ASUS TUF F15 FX507ZV4 [i7-12700H/16GB/RTX 4060/144Hz/512GB] [Graphite Black]";
//! if let Some(decoded) = context.decode_template().execute(template)? {
//!     let outcome = context
//!         .assemble_metafields()
//!         .execute(&AssemblyRequest::from_decoded(&decoded))?;
//!     println!("{} resolved, {} missing", outcome.resolved.len(), outcome.missing_count());
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod catalog;
pub mod config;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        DataLayout, FileComponentCatalog, FileMissingEntryLog, FileReportWriter,
        FileSpecificationStore, FileTemplateCache,
    };
    pub use crate::adapters::outbound::formatters::MarkdownReportFormatter;
    pub use crate::adapters::outbound::network::{ShopifyAdminClient, ShopifyConnection};
    pub use crate::application::dto::{
        AssemblyRequest, JobResponse, PublishRequest, PublishResponse, ResolveRequest,
    };
    pub use crate::application::services::MissingEntryTracker;
    pub use crate::application::use_cases::{
        AnalyzeGapsUseCase, AssembleMetafieldsUseCase, DecodeTemplateUseCase,
        PublishProductUseCase, ResolveMissingUseCase, ValidateCatalogUseCase,
    };
    pub use crate::application::AppContext;
    pub use crate::catalog::domain::{
        AssemblyOutcome, ComponentMapping, ComponentType, DecodedTemplate, FieldValue,
        MissContext, ProductFields,
    };
    pub use crate::catalog::policies::MatchPolicy;
    pub use crate::config::Settings;
    pub use crate::ports::outbound::{
        ComponentCatalog, ComponentCatalogWriter, MetaobjectRepository, MissingEntryRecorder,
        MissingEntryStore, ProductRepository, ProgressReporter, ReportFormatter, ReportWriter,
        SpecificationRepository, TemplateRepository,
    };
    pub use crate::shared::Result;
}

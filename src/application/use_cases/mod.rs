/// Use cases module containing application business logic orchestration
mod analyze_gaps;
mod assemble_metafields;
mod decode_template;
mod publish_product;
mod resolve_missing;
mod validate_catalog;

pub use analyze_gaps::{AnalyzeGapsUseCase, GAP_ANALYSIS_JOB};
pub use assemble_metafields::AssembleMetafieldsUseCase;
pub use decode_template::DecodeTemplateUseCase;
pub use publish_product::PublishProductUseCase;
pub use resolve_missing::{ResolveMissingUseCase, RESOLVE_MISSING_JOB};
pub use validate_catalog::{ValidateCatalogUseCase, CATALOG_VALIDATION_JOB};

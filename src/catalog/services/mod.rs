mod abbreviator;
mod catalog_validator;
mod gap_analyzer;
mod search_variations;
mod spec_validator;
mod template_generator;
mod template_parser;
mod template_resolver;

pub use abbreviator::{ComponentAbbreviator, NO_VGA_TOKEN};
pub use catalog_validator::{CatalogCheck, CatalogValidator};
pub use gap_analyzer::{GapAnalyzer, ANALYZED_TYPES};
pub use search_variations::{SearchVariations, MAX_VARIATIONS};
pub use spec_validator::{SpecValidationReport, SpecValidator};
pub use template_generator::TemplateGenerator;
pub use template_parser::TemplateParser;
pub use template_resolver::TemplateResolver;

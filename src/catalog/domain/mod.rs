pub mod component_type;
pub mod metafield;
pub mod missing_entry;
pub mod product;
pub mod publication;
pub mod reconciliation;
pub mod template;

pub use component_type::{ComponentMapping, ComponentType};
pub use metafield::{AssemblyOutcome, FieldValue, MetafieldValue, ProductFields};
pub use missing_entry::{
    FieldSummary, MissContext, MissingEntry, MissingEntryTable, SessionMiss, TrackerStatistics,
};
pub use product::{
    template_color, BrandCatalog, Configuration, LegacyModelView, ModelAttributes, ProductModel,
};
pub use publication::{
    CreatedProduct, MetafieldInput, ProductPayload, VariantInput, LITERAL_NAMESPACE,
    METAFIELD_NAMESPACE,
};
pub use reconciliation::{
    GapEntry, GapReport, IssueKind, JobStatus, ResolutionReport, ResolvedValue, Severity,
    TypeCoverage, UnresolvedValue, ValidationIssue, ValidationReport,
};
pub use template::{DecodedTemplate, LaptopTemplate, MatchKind, ParsedTemplate, SmartphoneTemplate};

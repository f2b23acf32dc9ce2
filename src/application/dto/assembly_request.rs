use crate::catalog::domain::{DecodedTemplate, FieldValue, MissContext, ProductFields};

/// AssemblyRequest - Input of the metafield assembler
///
/// `context` travels with every miss into the missing-entry log.
#[derive(Debug, Clone, Default)]
pub struct AssemblyRequest {
    pub fields: ProductFields,
    pub context: MissContext,
}

impl AssemblyRequest {
    pub fn new(fields: ProductFields, context: MissContext) -> Self {
        Self { fields, context }
    }

    /// Builds a request from a decoded template, tagging misses with the
    /// template as title plus its brand and model.
    pub fn from_decoded(decoded: &DecodedTemplate) -> Self {
        let mut context = MissContext::new();
        context.insert("title".to_string(), decoded.template.clone());
        context.insert("brand".to_string(), decoded.brand.clone());
        context.insert("model".to_string(), decoded.model.clone());
        Self {
            fields: decoded.to_product_fields(),
            context,
        }
    }

    /// Adds operator-entered fields (rank, inclusions, issues...).
    /// Entered values replace decoded ones of the same name.
    pub fn with_extra_fields(mut self, extra: ProductFields) -> Self {
        self.fields.extend(extra);
        self
    }

    pub fn with_field(mut self, name: &str, value: FieldValue) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }
}

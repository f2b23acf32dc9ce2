use crate::catalog::domain::DecodedTemplate;
use crate::catalog::policies::MatchPolicy;
use crate::catalog::services::TemplateResolver;
use crate::ports::outbound::SpecificationRepository;
use crate::shared::Result;

/// DecodeTemplateUseCase - Resolves a template string to full component names
///
/// # Type Parameters
/// * `S` - SpecificationRepository implementation
pub struct DecodeTemplateUseCase<S: SpecificationRepository> {
    specs: S,
    policy: MatchPolicy,
}

impl<S: SpecificationRepository> DecodeTemplateUseCase<S> {
    pub fn new(specs: S, policy: MatchPolicy) -> Self {
        Self { specs, policy }
    }

    /// Decodes `template` against every loadable brand.
    ///
    /// # Returns
    /// `None` when the template matches no known format or no stored
    /// configuration; the caller shows it to the operator unchanged.
    pub fn execute(&self, template: &str) -> Result<Option<DecodedTemplate>> {
        let models = self.specs.legacy_models()?;
        let decoded = TemplateResolver::new(&models, self.policy).resolve(template);
        match &decoded {
            Some(d) => tracing::debug!(template, model = %d.model, "template decoded"),
            None => tracing::debug!(template, "template not recognized"),
        }
        Ok(decoded)
    }
}

use super::abbreviator::ComponentAbbreviator;
use super::template_parser::TemplateParser;
use crate::catalog::domain::{
    ComponentType, DecodedTemplate, LaptopTemplate, LegacyModelView, MatchKind, ModelAttributes,
    ParsedTemplate, SmartphoneTemplate,
};
use crate::catalog::policies::MatchPolicy;
use std::collections::BTreeMap;

/// TemplateResolver maps template strings back to stored configurations.
///
/// Resolution compares abbreviated tokens, never full names: each stored
/// configuration is abbreviated with the same rules the generator used and
/// compared field by field against the parsed template.
pub struct TemplateResolver<'a> {
    models: &'a BTreeMap<String, LegacyModelView>,
    policy: MatchPolicy,
}

impl<'a> TemplateResolver<'a> {
    pub fn new(models: &'a BTreeMap<String, LegacyModelView>, policy: MatchPolicy) -> Self {
        Self { models, policy }
    }

    /// Parses and resolves `template`. `None` means the template could not
    /// be matched and must be shown to the operator as unparseable.
    pub fn resolve(&self, template: &str) -> Option<DecodedTemplate> {
        match TemplateParser::parse(template)? {
            ParsedTemplate::Laptop(parsed) => self.resolve_laptop(template, &parsed),
            ParsedTemplate::Smartphone(parsed) => self.resolve_smartphone(template, &parsed),
        }
    }

    fn find_model(&self, model_key: &str) -> Option<&'a LegacyModelView> {
        let models: &'a BTreeMap<String, LegacyModelView> = self.models;
        models.get(model_key).or_else(|| {
            models
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(model_key))
                .map(|(_, view)| view)
        })
    }

    fn resolve_laptop(&self, template: &str, parsed: &LaptopTemplate) -> Option<DecodedTemplate> {
        let view = self.find_model(&parsed.model)?;
        let wanted = [
            parsed.cpu.as_str(),
            parsed.ram.as_str(),
            parsed.vga.as_str(),
            parsed.display.as_str(),
            parsed.storage.as_str(),
        ];
        let stored_color = view.find_color(&parsed.color);
        let color_known = stored_color.is_some();

        let scores: Vec<(usize, usize)> = view
            .configurations
            .iter()
            .enumerate()
            .map(|(index, config)| {
                let tokens = ComponentAbbreviator::configuration_tokens(config);
                let matched = tokens
                    .iter()
                    .zip(wanted.iter())
                    .filter(|(actual, expected)| actual.eq_ignore_ascii_case(expected))
                    .count()
                    + usize::from(color_known);
                (index, matched)
            })
            .collect();

        let (index, match_kind) = self.policy.select(&scores)?;
        Some(DecodedTemplate {
            template: template.trim().to_string(),
            brand: view.brand.clone(),
            model: view.model_key.clone(),
            category: view.category.clone(),
            configuration: view.configurations[index].clone(),
            color: stored_color.unwrap_or(&parsed.color).to_string(),
            inclusion_preset: None,
            match_kind,
        })
    }

    fn resolve_smartphone(
        &self,
        template: &str,
        parsed: &SmartphoneTemplate,
    ) -> Option<DecodedTemplate> {
        let view = self.find_model(&parsed.model)?;
        let color = view.find_color(&parsed.color)?;

        let configuration = view.configurations.iter().find(|config| {
            ComponentAbbreviator::token(
                config.component(ComponentType::Storage),
                ComponentType::Storage,
            )
            .eq_ignore_ascii_case(&parsed.storage)
        })?;

        Some(DecodedTemplate {
            template: template.trim().to_string(),
            brand: view.brand.clone(),
            model: view.model_key.clone(),
            category: view.category.clone(),
            configuration: configuration.clone(),
            color: color.to_string(),
            inclusion_preset: parsed.inclusion_preset.clone(),
            match_kind: MatchKind::Exact,
        })
    }
}

use super::abbreviator::ComponentAbbreviator;
use crate::catalog::domain::{
    template_color, BrandCatalog, ComponentType, Configuration, ModelAttributes, ProductModel,
};
use std::collections::BTreeSet;

/// TemplateGenerator expands models into every (configuration × color)
/// template string.
pub struct TemplateGenerator;

impl TemplateGenerator {
    /// Sorted, de-duplicated templates across all brands.
    pub fn generate(brands: &[BrandCatalog]) -> Vec<String> {
        brands
            .iter()
            .flat_map(|brand| brand.models.iter())
            .flat_map(|(key, model)| Self::for_model(key, model))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Templates for one model, in configuration-then-color order.
    ///
    /// Models without colors produce nothing; spec validation flags them.
    /// Colors with nothing left after bracket removal are skipped.
    pub fn for_model(model_key: &str, model: &ProductModel) -> Vec<String> {
        let smartphone = model.is_smartphone();
        let colors: Vec<String> = model
            .colors
            .iter()
            .map(|c| template_color(c))
            .filter(|c| !c.is_empty())
            .collect();
        model
            .configurations
            .iter()
            .flat_map(|config| {
                colors.iter().filter_map(move |color| {
                    if smartphone {
                        Self::smartphone(model_key, config, color)
                    } else {
                        Some(Self::laptop(model_key, config, color))
                    }
                })
            })
            .collect()
    }

    pub fn laptop(model_key: &str, config: &Configuration, color: &str) -> String {
        let [cpu, ram, vga, display, storage] = ComponentAbbreviator::configuration_tokens(config);
        format!(
            "{} [{}/{}/{}/{}/{}] [{}]",
            model_key.trim(),
            cpu,
            ram,
            vga,
            display,
            storage,
            template_color(color)
        )
    }

    /// `None` when the configuration has no storage to key the template on.
    pub fn smartphone(model_key: &str, config: &Configuration, color: &str) -> Option<String> {
        let storage = config.component(ComponentType::Storage)?;
        let token = ComponentAbbreviator::token(Some(storage), ComponentType::Storage);
        Some(format!("{} {} [{}]", model_key.trim(), token, template_color(color)))
    }
}

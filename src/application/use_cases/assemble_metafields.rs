use crate::application::dto::AssemblyRequest;
use crate::catalog::domain::{AssemblyOutcome, ComponentType, MetafieldValue};
use crate::ports::outbound::{ComponentCatalog, MissingEntryRecorder};
use crate::shared::Result;

/// AssembleMetafieldsUseCase - Resolves product fields to catalog identifiers
///
/// Field names go through the alias table; names that map to no component
/// type are skipped. List-typed components resolve element by element, so
/// one unknown inclusion never drops the known ones. Every miss is recorded
/// before the outcome is returned.
///
/// # Type Parameters
/// * `C` - ComponentCatalog implementation
/// * `R` - MissingEntryRecorder implementation
pub struct AssembleMetafieldsUseCase<C: ComponentCatalog, R: MissingEntryRecorder> {
    catalog: C,
    recorder: R,
}

impl<C: ComponentCatalog, R: MissingEntryRecorder> AssembleMetafieldsUseCase<C, R> {
    pub fn new(catalog: C, recorder: R) -> Self {
        Self { catalog, recorder }
    }

    /// # Errors
    /// Fails only when a catalog file is malformed; a missing value is
    /// reported in the outcome, never as an error.
    pub fn execute(&self, request: &AssemblyRequest) -> Result<AssemblyOutcome> {
        let mut outcome = AssemblyOutcome::default();

        for (field_name, value) in &request.fields {
            let Some(component_type) = ComponentType::from_field_name(field_name) else {
                tracing::debug!(field = %field_name, "skipping field with no catalog type");
                continue;
            };
            let values = value.values();
            if values.is_empty() {
                continue;
            }

            if component_type.is_list() {
                self.resolve_list(field_name, component_type, &values, request, &mut outcome)?;
            } else {
                if values.len() > 1 {
                    tracing::warn!(
                        field = %field_name,
                        count = values.len(),
                        "single-valued field given a list; using the first element"
                    );
                }
                self.resolve_single(field_name, component_type, values[0], request, &mut outcome)?;
            }
        }

        Ok(outcome)
    }

    fn resolve_single(
        &self,
        field_name: &str,
        component_type: ComponentType,
        value: &str,
        request: &AssemblyRequest,
        outcome: &mut AssemblyOutcome,
    ) -> Result<()> {
        let key = component_type.metafield_key();
        match self.catalog.get_id(component_type, value)? {
            Some(id) => {
                outcome
                    .resolved
                    .insert(key.to_string(), MetafieldValue::Reference(id));
            }
            None => {
                self.recorder.record(field_name, value, &request.context);
                outcome
                    .missing
                    .entry(field_name.to_string())
                    .or_default()
                    .push(value.to_string());
                outcome.literals.insert(key.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    fn resolve_list(
        &self,
        field_name: &str,
        component_type: ComponentType,
        values: &[&str],
        request: &AssemblyRequest,
        outcome: &mut AssemblyOutcome,
    ) -> Result<()> {
        let mut ids = Vec::new();
        for value in values {
            match self.catalog.get_id(component_type, value)? {
                Some(id) if !ids.contains(&id) => ids.push(id),
                Some(_) => {}
                None => {
                    self.recorder.record(field_name, value, &request.context);
                    outcome
                        .missing
                        .entry(field_name.to_string())
                        .or_default()
                        .push(value.to_string());
                }
            }
        }
        if !ids.is_empty() {
            outcome.resolved.insert(
                component_type.metafield_key().to_string(),
                MetafieldValue::References(ids),
            );
        }
        Ok(())
    }
}

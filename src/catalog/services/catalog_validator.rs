use crate::catalog::domain::{
    ComponentMapping, ComponentType, IssueKind, Severity, ValidationIssue,
};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// Per-type validation tally fed into the health score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogCheck {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub issues: Vec<ValidationIssue>,
}

/// CatalogValidator checks mapping entries for structural defects.
///
/// An entry is valid when its name is non-blank and its identifier has the
/// platform prefix followed by a numeric id. Identifiers shared by several
/// names are reported as warnings but still count as valid.
pub struct CatalogValidator {
    identifier: Regex,
}

impl CatalogValidator {
    pub fn new(gid_prefix: &str) -> Self {
        let pattern = format!(r"^{}\d+$", regex::escape(gid_prefix));
        let identifier = Regex::new(&pattern).expect("escaped prefix must compile");
        Self { identifier }
    }

    pub fn is_valid_identifier(&self, id: &str) -> bool {
        self.identifier.is_match(id.trim())
    }

    pub fn check(&self, mappings: &BTreeMap<ComponentType, ComponentMapping>) -> CatalogCheck {
        let mut check = CatalogCheck::default();
        for (component_type, mapping) in mappings {
            self.check_mapping(*component_type, mapping, &mut check);
        }
        check
    }

    fn check_mapping(
        &self,
        component_type: ComponentType,
        mapping: &ComponentMapping,
        check: &mut CatalogCheck,
    ) {
        let mut names_by_id: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

        for (name, id) in mapping {
            check.total_entries += 1;
            let mut valid = true;

            if name.trim().is_empty() {
                valid = false;
                check.issues.push(ValidationIssue {
                    severity: Severity::Error,
                    kind: IssueKind::BlankName,
                    component_type,
                    name: name.clone(),
                    remote_id: id.clone(),
                    message: format!("{} entry has an empty name", component_type),
                });
            }

            if !self.is_valid_identifier(id) {
                valid = false;
                check.issues.push(ValidationIssue {
                    severity: Severity::Error,
                    kind: IssueKind::InvalidIdentifier,
                    component_type,
                    name: name.clone(),
                    remote_id: id.clone(),
                    message: format!("'{}' maps to malformed identifier '{}'", name, id),
                });
            } else {
                names_by_id.entry(id.trim()).or_default().insert(name);
            }

            if valid {
                check.valid_entries += 1;
            }
        }

        for (id, names) in names_by_id.into_iter().filter(|(_, n)| n.len() > 1) {
            let listed = names.iter().copied().collect::<Vec<_>>().join(", ");
            for name in names {
                check.issues.push(ValidationIssue {
                    severity: Severity::Warning,
                    kind: IssueKind::DuplicateIdentifier,
                    component_type,
                    name: name.to_string(),
                    remote_id: id.to_string(),
                    message: format!("'{}' is shared by: {}", id, listed),
                });
            }
        }
    }
}

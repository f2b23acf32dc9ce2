use crate::catalog::domain::{LaptopTemplate, ParsedTemplate, SmartphoneTemplate};
use regex::Regex;
use std::sync::OnceLock;

static BRACKET_GROUP: OnceLock<Regex> = OnceLock::new();
static STORAGE_TOKEN: OnceLock<Regex> = OnceLock::new();

/// Number of `/`-separated fields in a laptop template's first bracket.
const LAPTOP_FIELD_COUNT: usize = 5;

/// TemplateParser splits template strings into their raw fields.
///
/// Recognized formats:
/// - `{model} [{cpu}/{ram}/{vga}/{display}/{storage}] [{color}]`
/// - `{model} {storage} [{color}]` (legacy smartphone, one bracket)
/// - `{model} {storage} [{color}] [{inclusion preset}]`
///
/// Anything else parses to `None`; the caller reports it to the operator.
pub struct TemplateParser;

impl TemplateParser {
    pub fn parse(template: &str) -> Option<ParsedTemplate> {
        let template = template.trim();
        let first_bracket = template.find('[')?;
        let head = template[..first_bracket].trim();
        if head.is_empty() {
            return None;
        }

        let groups = Self::bracket_groups(&template[first_bracket..])?;

        // A smartphone color may itself contain `/`
        Self::parse_laptop(head, &groups).or_else(|| Self::parse_smartphone(head, &groups))
    }

    /// Bracket contents after the model. Returns `None` if brackets are
    /// unbalanced, nested, or separated by anything but whitespace.
    fn bracket_groups(tail: &str) -> Option<Vec<String>> {
        let pattern = BRACKET_GROUP.get_or_init(|| {
            Regex::new(r"^\s*\[([^\[\]]*)\]").expect("bracket pattern must compile")
        });

        let mut groups = Vec::new();
        let mut rest = tail;
        while !rest.trim().is_empty() {
            let captures = pattern.captures(rest)?;
            groups.push(captures[1].trim().to_string());
            rest = &rest[captures.get(0)?.end()..];
        }

        if groups.is_empty() || tail.matches('[').count() != groups.len() {
            return None;
        }
        Some(groups)
    }

    fn parse_laptop(model: &str, groups: &[String]) -> Option<ParsedTemplate> {
        if groups.len() != 2 {
            return None;
        }
        let fields: Vec<&str> = groups[0].split('/').map(str::trim).collect();
        if fields.len() != LAPTOP_FIELD_COUNT {
            return None;
        }
        let color = groups[1].trim();
        if color.is_empty() {
            return None;
        }

        Some(ParsedTemplate::Laptop(LaptopTemplate {
            model: model.to_string(),
            cpu: fields[0].to_string(),
            ram: fields[1].to_string(),
            vga: fields[2].to_string(),
            display: fields[3].to_string(),
            storage: fields[4].to_string(),
            color: color.to_string(),
        }))
    }

    fn parse_smartphone(head: &str, groups: &[String]) -> Option<ParsedTemplate> {
        let inclusion_preset = match groups.len() {
            1 => None,
            2 => Some(groups[1].clone()).filter(|p| !p.is_empty()),
            _ => return None,
        };
        let color = groups[0].trim();
        if color.is_empty() {
            return None;
        }

        let storage_pattern = STORAGE_TOKEN.get_or_init(|| {
            Regex::new(r"(?i)^\d+(GB|TB)$").expect("storage pattern must compile")
        });
        let tokens: Vec<&str> = head.split_whitespace().collect();
        let storage_index = tokens.iter().rposition(|t| storage_pattern.is_match(t))?;
        if storage_index == 0 {
            return None;
        }

        let model = tokens
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != storage_index)
            .map(|(_, t)| *t)
            .collect::<Vec<_>>()
            .join(" ");

        Some(ParsedTemplate::Smartphone(SmartphoneTemplate {
            model,
            storage: tokens[storage_index].to_uppercase(),
            color: color.to_string(),
            inclusion_preset,
        }))
    }
}

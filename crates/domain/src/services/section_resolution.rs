//! Section resolution service.
//!
//! Merges a business type's default section schema with a tenant's saved
//! sections and produces the order in which sections are rendered.
//!
//! Precedence (lowest to highest):
//! 1. Template default payload / template default visibility
//! 2. Tenant payload / tenant visibility override
//!
//! Nothing here fails: unknown keys are ignored and missing payloads are
//! treated as absent.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{
    is_config_only, is_empty_payload, BusinessTemplate, ConfigSections, SectionDefinition,
    SectionOrderHint,
};

/// Where a resolved section payload came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SectionSource {
    Tenant,
    TemplateDefault,
}

impl std::fmt::Display for SectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tenant => write!(f, "tenant"),
            Self::TemplateDefault => write!(f, "template_default"),
        }
    }
}

/// Merged section payloads plus the order to render them in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolvedSections {
    /// Tenant payloads with template defaults filled in
    pub sections: ConfigSections,
    /// Visible section keys that have a payload, in render order
    pub order: Vec<String>,
    /// Source of each payload for debugging
    pub sources: BTreeMap<String, SectionSource>,
}

impl ResolvedSections {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.sections.get(key)
    }

    pub fn get_source(&self, key: &str) -> Option<SectionSource> {
        self.sources.get(key).copied()
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}

/// Resolve the ordered list of section keys to render.
///
/// The hint's order list (when present) is the base order; template keys it
/// does not mention are appended in template order. Keys resolved as disabled
/// are dropped, as are the configuration-only `colors` and `font` keys.
/// `footer` and `copyright` are kept; moving them last is up to the caller.
pub fn resolve_section_order(
    hint: Option<&SectionOrderHint>,
    template_sections: &[SectionDefinition],
) -> Vec<String> {
    let mut declared: HashMap<&str, &SectionDefinition> =
        HashMap::with_capacity(template_sections.len());
    for section in template_sections {
        declared.entry(section.key.as_str()).or_insert(section);
    }

    let hinted = hint.and_then(|h| h.order.as_deref()).unwrap_or_default();

    if let Some(hint) = hint {
        let unknown: Vec<&str> = hint
            .mentioned_keys()
            .filter(|k| !declared.contains_key(k))
            .collect();
        if !unknown.is_empty() {
            tracing::debug!(keys = ?unknown, "Ignoring unknown section keys in order hint");
        }
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(declared.len());
    hinted
        .iter()
        .map(String::as_str)
        .chain(template_sections.iter().map(|s| s.key.as_str()))
        .filter_map(|key| declared.get(key).copied())
        .filter(|section| seen.insert(section.key.as_str()))
        .filter(|section| !section.is_config_only())
        .filter(|section| is_section_enabled(hint, section))
        .map(|section| section.key.clone())
        .collect()
}

/// Resolve the visibility of one section: tenant override, else template default.
pub fn is_section_enabled(hint: Option<&SectionOrderHint>, section: &SectionDefinition) -> bool {
    hint.and_then(|h| h.enabled_override(&section.key))
        .unwrap_or(section.enabled)
}

/// Fill in template defaults for sections the tenant has not saved.
///
/// A tenant key counts as missing when it is absent, `null` or `{}`. Tenant
/// payloads are never overwritten and tenant keys unknown to the defaults
/// are kept. Applying this twice is the same as applying it once.
pub fn ensure_required_sections(
    tenant_sections: &ConfigSections,
    template_defaults: &ConfigSections,
) -> ConfigSections {
    let mut merged = tenant_sections.clone();

    for (key, default) in template_defaults {
        let missing = merged.get(key).map_or(true, is_empty_payload);
        if missing {
            merged.insert(key.clone(), default.clone());
        }
    }

    merged
}

/// Merge payloads and resolve the render order in one pass.
///
/// Only sections with a payload after merging appear in `order`; a section
/// with neither a tenant payload nor a template default is not rendered.
pub fn resolve_sections(
    template: &BusinessTemplate,
    tenant_sections: &ConfigSections,
    hint: Option<&SectionOrderHint>,
) -> ResolvedSections {
    let defaults = template.defaults();
    let sections = ensure_required_sections(tenant_sections, &defaults);

    let sources = sections
        .keys()
        .map(|key| {
            let from_tenant = tenant_sections
                .get(key)
                .is_some_and(|value| !is_empty_payload(value));
            let source = if !from_tenant && defaults.contains_key(key) {
                SectionSource::TemplateDefault
            } else {
                SectionSource::Tenant
            };
            (key.clone(), source)
        })
        .collect();

    let order = resolve_section_order(hint, &template.sections)
        .into_iter()
        .filter(|key| sections.get(key).is_some_and(|value| !value.is_null()))
        .collect();

    ResolvedSections {
        sections,
        order,
        sources,
    }
}

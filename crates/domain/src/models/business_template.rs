//! Business template domain models.
//!
//! A business template is the static default schema for one business type
//! (e.g. `cafe`, `fitness`). It is owned by the template catalog and is
//! read-only everywhere else.

use serde::{Deserialize, Serialize};

use super::section::{ConfigSections, SectionDefinition};

/// Default section schema for one business type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BusinessTemplate {
    pub business_type: String,
    pub name: String,
    /// Sections in declaration order
    pub sections: Vec<SectionDefinition>,
}

/// Catalog listing entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BusinessTemplateSummary {
    pub business_type: String,
    pub name: String,
    pub section_count: usize,
}

impl BusinessTemplate {
    pub fn new(
        business_type: impl Into<String>,
        name: impl Into<String>,
        sections: Vec<SectionDefinition>,
    ) -> Self {
        Self {
            business_type: business_type.into(),
            name: name.into(),
            sections,
        }
    }

    /// Find a section definition by key.
    pub fn section(&self, key: &str) -> Option<&SectionDefinition> {
        self.sections.iter().find(|s| s.key == key)
    }

    /// Section keys in declaration order.
    pub fn section_keys(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.key.as_str())
    }

    /// Default payloads of every section that declares one.
    pub fn defaults(&self) -> ConfigSections {
        self.sections
            .iter()
            .filter_map(|s| {
                s.default_data
                    .as_ref()
                    .map(|data| (s.key.clone(), data.clone()))
            })
            .collect()
    }

    pub fn summary(&self) -> BusinessTemplateSummary {
        BusinessTemplateSummary {
            business_type: self.business_type.clone(),
            name: self.name.clone(),
            section_count: self.sections.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cafe() -> BusinessTemplate {
        BusinessTemplate::new(
            "cafe",
            "Cafe",
            vec![
                SectionDefinition::new("header").with_default(json!({"name": "Cafe"})),
                SectionDefinition::new("about"),
                SectionDefinition::new("contact").with_default(json!({})),
            ],
        )
    }

    #[test]
    fn test_section_lookup() {
        let template = cafe();
        assert_eq!(template.section("about").map(|s| s.key.as_str()), Some("about"));
        assert!(template.section("videos").is_none());
    }

    #[test]
    fn test_section_keys_preserve_declaration_order() {
        let template = cafe();
        let keys: Vec<&str> = template.section_keys().collect();
        assert_eq!(keys, vec!["header", "about", "contact"]);
    }

    #[test]
    fn test_defaults_skip_sections_without_default() {
        let defaults = cafe().defaults();
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults.get("header"), Some(&json!({"name": "Cafe"})));
        assert_eq!(defaults.get("contact"), Some(&json!({})));
        assert!(!defaults.contains_key("about"));
    }

    #[test]
    fn test_summary() {
        let summary = cafe().summary();
        assert_eq!(summary.business_type, "cafe");
        assert_eq!(summary.section_count, 3);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"section_count\":3"));
    }
}

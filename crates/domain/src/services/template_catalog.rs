//! Business template catalog.
//!
//! Holds the default section schema of every supported business type. The
//! catalog is loaded once at startup and is read-only afterwards.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;

use crate::models::{BusinessTemplate, BusinessTemplateSummary};

/// Templates bundled with the crate.
const BUILTIN_TEMPLATES: &str = include_str!("../../templates/builtin.json");

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read template file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse templates: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid business type: {0}")]
    InvalidBusinessType(String),

    #[error("Template {0} declares no sections")]
    EmptySections(String),

    #[error("Template {business_type} declares section {key} more than once")]
    DuplicateSection { business_type: String, key: String },

    #[error("Template {business_type} has invalid section key: {key}")]
    InvalidSectionKey { business_type: String, key: String },

    #[error("Business type {0} is defined more than once")]
    DuplicateBusinessType(String),
}

/// Business templates keyed by business type.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, BusinessTemplate>,
}

impl TemplateCatalog {
    /// Catalog of the bundled templates.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_TEMPLATES)
    }

    /// Build a catalog from templates, validating each one.
    pub fn from_templates(
        templates: impl IntoIterator<Item = BusinessTemplate>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        catalog.extend(templates)?;
        Ok(catalog)
    }

    /// Parse a JSON array of templates.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let templates: Vec<BusinessTemplate> = serde_json::from_str(json)?;
        Self::from_templates(templates)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Add templates. Fails on the first invalid template or business type
    /// already in the catalog, leaving earlier additions in place.
    pub fn extend(
        &mut self,
        templates: impl IntoIterator<Item = BusinessTemplate>,
    ) -> Result<(), CatalogError> {
        for template in templates {
            Self::validate(&template)?;
            if self.templates.contains_key(&template.business_type) {
                return Err(CatalogError::DuplicateBusinessType(template.business_type));
            }
            self.templates
                .insert(template.business_type.clone(), template);
        }
        Ok(())
    }

    /// Overlay another catalog. Its templates replace same-typed ones here.
    pub fn merge(&mut self, other: TemplateCatalog) {
        for business_type in other.templates.keys() {
            if self.templates.contains_key(business_type) {
                tracing::info!(business_type = %business_type, "Overriding builtin template");
            }
        }
        self.templates.extend(other.templates);
    }

    /// Check one template's business type and section keys.
    pub fn validate(template: &BusinessTemplate) -> Result<(), CatalogError> {
        if shared::validation::validate_business_type(&template.business_type).is_err() {
            return Err(CatalogError::InvalidBusinessType(
                template.business_type.clone(),
            ));
        }
        if template.sections.is_empty() {
            return Err(CatalogError::EmptySections(template.business_type.clone()));
        }

        let mut seen = HashSet::new();
        for section in &template.sections {
            if shared::validation::validate_section_key(&section.key).is_err() {
                return Err(CatalogError::InvalidSectionKey {
                    business_type: template.business_type.clone(),
                    key: section.key.clone(),
                });
            }
            if !seen.insert(section.key.as_str()) {
                return Err(CatalogError::DuplicateSection {
                    business_type: template.business_type.clone(),
                    key: section.key.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn get(&self, business_type: &str) -> Option<&BusinessTemplate> {
        self.templates.get(business_type)
    }

    /// Business types in sorted order.
    pub fn business_types(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    pub fn summaries(&self) -> Vec<BusinessTemplateSummary> {
        self.templates.values().map(BusinessTemplate::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

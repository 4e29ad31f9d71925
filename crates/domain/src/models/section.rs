//! Section domain models.
//!
//! A section is one named, independently toggle-able block of profile
//! content such as `contact` or `videos`.

use serde::{Deserialize, Serialize};

/// Tenant-specific section payloads keyed by section key.
pub type ConfigSections = serde_json::Map<String, serde_json::Value>;

/// Sections that carry configuration only and are never rendered.
pub const CONFIG_ONLY_SECTIONS: [&str; 2] = ["colors", "font"];

/// Sections that templates render after every other section.
pub const TRAILING_SECTIONS: [&str; 2] = ["footer", "copyright"];

/// One section declared by a business template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SectionDefinition {
    pub key: String,
    /// Template default visibility; tenant overrides take precedence
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Payload used when the tenant has not saved one (None = no default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_data: Option<serde_json::Value>,
}

fn default_enabled() -> bool {
    true
}

impl SectionDefinition {
    /// Create an enabled section without a default payload.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            enabled: true,
            default_data: None,
        }
    }

    /// Attach a default payload.
    pub fn with_default(mut self, data: serde_json::Value) -> Self {
        self.default_data = Some(data);
        self
    }

    /// Mark the section as hidden unless a tenant enables it.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_config_only(&self) -> bool {
        is_config_only(&self.key)
    }
}

/// Whether a key only carries configuration (`colors`, `font`).
pub fn is_config_only(key: &str) -> bool {
    CONFIG_ONLY_SECTIONS.contains(&key)
}

/// Whether a key is rendered after the main pass (`footer`, `copyright`).
pub fn is_trailing(key: &str) -> bool {
    TRAILING_SECTIONS.contains(&key)
}

/// Whether a payload counts as missing: `null` or an empty object.
pub fn is_empty_payload(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

//! Tenant ordering and visibility overrides for sections.
//!
//! Saved profiles carry these overrides in several shapes, all normalized
//! into [`SectionOrderHint`] on deserialization:
//!
//! - canonical: `{"order": ["contact", "header"], "enabled": {"about": false}}`
//! - list: `[{"key": "contact", "enabled": true, "order": 1}, ...]`
//! - settings map: `{"about": {"enabled": false, "order": 2}, ...}`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A hint value that matches none of the accepted shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("section_order has an unsupported shape")]
pub struct UnsupportedHintShape;

/// Normalized ordering/visibility overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct SectionOrderHint {
    /// Explicit base order; None falls back to template order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
    /// Explicit per-key visibility overrides
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub enabled: BTreeMap<String, bool>,
}

impl SectionOrderHint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_enabled(mut self, key: impl Into<String>, enabled: bool) -> Self {
        self.enabled.insert(key.into(), enabled);
        self
    }

    /// Explicit visibility override for a key, if any.
    pub fn enabled_override(&self, key: &str) -> Option<bool> {
        self.enabled.get(key).copied()
    }

    /// Decode a stored hint, ignoring it when it matches no accepted shape.
    pub fn from_value_lenient(value: &serde_json::Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        match Self::try_from(value.clone()) {
            Ok(hint) => Some(hint),
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring malformed section order hint");
                None
            }
        }
    }

    /// Keys mentioned anywhere in the hint.
    pub fn mentioned_keys(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .flatten()
            .map(String::as_str)
            .chain(self.enabled.keys().map(String::as_str))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSectionOrderHint {
    Canonical(CanonicalHint),
    List(Vec<SectionSettingEntry>),
    Settings(BTreeMap<String, SectionSetting>),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CanonicalHint {
    #[serde(default)]
    order: Option<Vec<String>>,
    #[serde(default)]
    enabled: BTreeMap<String, bool>,
}

#[derive(Deserialize)]
struct SectionSettingEntry {
    key: String,
    #[serde(default, alias = "visible")]
    enabled: Option<bool>,
    #[serde(default)]
    order: Option<i64>,
}

#[derive(Deserialize)]
struct SectionSetting {
    #[serde(default, alias = "visible")]
    enabled: Option<bool>,
    #[serde(default)]
    order: Option<i64>,
}

impl TryFrom<serde_json::Value> for SectionOrderHint {
    type Error = UnsupportedHintShape;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        serde_json::from_value::<RawSectionOrderHint>(value)
            .map(Self::from)
            .map_err(|_| UnsupportedHintShape)
    }
}

impl From<RawSectionOrderHint> for SectionOrderHint {
    fn from(raw: RawSectionOrderHint) -> Self {
        match raw {
            RawSectionOrderHint::Canonical(hint) => Self {
                order: hint.order,
                enabled: hint.enabled,
            },
            RawSectionOrderHint::List(mut entries) => {
                // Stable: entries without a position keep list order, after positioned ones
                if entries.iter().any(|e| e.order.is_some()) {
                    entries.sort_by_key(|e| e.order.unwrap_or(i64::MAX));
                }
                let enabled = entries
                    .iter()
                    .filter_map(|e| e.enabled.map(|flag| (e.key.clone(), flag)))
                    .collect();
                Self {
                    order: Some(entries.into_iter().map(|e| e.key).collect()),
                    enabled,
                }
            }
            RawSectionOrderHint::Settings(settings) => {
                let mut positioned: Vec<(i64, &String)> = settings
                    .iter()
                    .filter_map(|(key, s)| s.order.map(|pos| (pos, key)))
                    .collect();
                // BTreeMap iteration is key-sorted, so ties stay alphabetical
                positioned.sort_by_key(|(pos, _)| *pos);
                let order = if positioned.is_empty() {
                    None
                } else {
                    Some(positioned.into_iter().map(|(_, k)| k.clone()).collect())
                };
                let enabled = settings
                    .iter()
                    .filter_map(|(key, s)| s.enabled.map(|flag| (key.clone(), flag)))
                    .collect();
                Self { order, enabled }
            }
        }
    }
}

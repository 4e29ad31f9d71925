//! Section resolution endpoints.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use domain::models::{ConfigSections, SectionOrderHint};
use domain::services::{ensure_required_sections, resolve_section_order};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::find_template;
use crate::app::AppState;
use crate::error::ApiError;

/// Request to resolve the visible section order of a profile.
#[derive(Debug, Deserialize, Validate)]
pub struct ResolveOrderRequest {
    #[validate(custom(function = "shared::validation::validate_business_type"))]
    pub business_type: String,

    /// Tenant ordering/visibility overrides in any accepted shape
    #[serde(default)]
    pub section_order: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ResolveOrderResponse {
    pub business_type: String,
    pub order: Vec<String>,
}

/// Request to fill template defaults into tenant sections.
#[derive(Debug, Deserialize, Validate)]
pub struct ApplyDefaultsRequest {
    #[validate(custom(function = "shared::validation::validate_business_type"))]
    pub business_type: String,

    #[serde(default)]
    pub sections: ConfigSections,
}

#[derive(Debug, Serialize)]
pub struct ApplyDefaultsResponse {
    pub business_type: String,
    pub sections: ConfigSections,
    /// Keys whose payload came from the template defaults
    pub defaulted: Vec<String>,
}

/// Reject order hints with too many or oversized keys.
fn validate_hint(hint: &SectionOrderHint) -> Result<(), ApiError> {
    let Some(order) = hint.order.as_deref() else {
        return Ok(());
    };
    shared::validation::validate_order_keys(order).map_err(|e| {
        ApiError::Validation(format!(
            "section_order: {}",
            e.message.unwrap_or_default()
        ))
    })
}

/// Decode a tenant hint. Hints with an unsupported shape or an oversized
/// order are ignored so the template order applies.
pub(crate) fn decode_hint(raw: Option<&serde_json::Value>) -> Option<SectionOrderHint> {
    let hint = SectionOrderHint::from_value_lenient(raw?)?;
    match validate_hint(&hint) {
        Ok(()) => Some(hint),
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring section order hint");
            None
        }
    }
}

/// Resolve the ordered list of visible section keys.
///
/// POST /api/v1/sections/order
pub async fn resolve_order(
    State(state): State<AppState>,
    payload: Result<Json<ResolveOrderRequest>, JsonRejection>,
) -> Result<Json<ResolveOrderResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    let hint = decode_hint(request.section_order.as_ref());

    let template = find_template(&state, &request.business_type)?;
    let order = resolve_section_order(hint.as_ref(), &template.sections);

    tracing::debug!(
        business_type = %request.business_type,
        visible = order.len(),
        "Resolved section order"
    );

    Ok(Json(ResolveOrderResponse {
        business_type: request.business_type,
        order,
    }))
}

/// Fill missing tenant sections with template defaults.
///
/// POST /api/v1/sections/defaults
pub async fn apply_defaults(
    State(state): State<AppState>,
    payload: Result<Json<ApplyDefaultsRequest>, JsonRejection>,
) -> Result<Json<ApplyDefaultsResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let template = find_template(&state, &request.business_type)?;
    let defaults = template.defaults();
    let sections = ensure_required_sections(&request.sections, &defaults);

    let defaulted = defaults
        .keys()
        .filter(|key| request.sections.get(*key) != sections.get(*key))
        .cloned()
        .collect();

    Ok(Json(ApplyDefaultsResponse {
        business_type: request.business_type,
        sections,
        defaulted,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_hint_without_order() {
        let hint = SectionOrderHint::new().with_enabled("about", false);
        assert!(validate_hint(&hint).is_ok());
    }

    #[test]
    fn test_validate_hint_rejects_oversized_order() {
        let keys: Vec<String> = (0..=shared::validation::MAX_ORDER_KEYS)
            .map(|i| format!("section_{}", i))
            .collect();
        let hint = SectionOrderHint::new().with_order(keys);
        assert!(matches!(validate_hint(&hint), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_decode_hint_ignores_unusable_hints() {
        let valid = serde_json::json!({"order": ["videos"], "enabled": {"about": false}});
        assert_eq!(
            decode_hint(Some(&valid)),
            Some(
                SectionOrderHint::new()
                    .with_order(["videos"])
                    .with_enabled("about", false)
            )
        );

        let malformed = serde_json::json!({"order": ["videos"], "enabled": {"about": "no"}});
        assert_eq!(decode_hint(Some(&malformed)), None);

        let keys: Vec<String> = (0..=shared::validation::MAX_ORDER_KEYS)
            .map(|i| format!("section_{}", i))
            .collect();
        assert_eq!(decode_hint(Some(&serde_json::json!({ "order": keys }))), None);
        assert_eq!(decode_hint(None), None);
    }

    #[test]
    fn test_request_validation() {
        let request = ResolveOrderRequest {
            business_type: "Not A Slug".to_string(),
            section_order: None,
        };
        assert!(request.validate().is_err());

        let request = ApplyDefaultsRequest {
            business_type: "music-artist".to_string(),
            sections: ConfigSections::new(),
        };
        assert!(request.validate().is_ok());
    }
}

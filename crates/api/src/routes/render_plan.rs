//! Render plan endpoint.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use domain::models::ConfigSections;
use domain::services::{build_render_plan_with_limit, RenderPlan, VIDEO_LIST_FIELD};
use serde::Deserialize;
use validator::Validate;

use super::find_template;
use super::sections::decode_hint;
use crate::app::AppState;
use crate::config::LimitsConfig;
use crate::error::ApiError;
use crate::middleware::metrics::{record_embed_extraction, record_render_plan};

/// Request to build the render plan of one tenant profile.
#[derive(Debug, Deserialize, Validate)]
pub struct RenderPlanRequest {
    #[validate(custom(function = "shared::validation::validate_business_type"))]
    pub business_type: String,

    /// Saved tenant section payloads
    #[serde(default)]
    pub sections: ConfigSections,

    /// Ordering hint in any accepted shape; ignored when malformed
    #[serde(default)]
    pub section_order: Option<serde_json::Value>,
}

/// Bound the number of video entries per section. Over-long embed fields
/// are not rejected here; they render as placeholders.
fn check_video_limits(sections: &ConfigSections, limits: &LimitsConfig) -> Result<(), ApiError> {
    for (key, payload) in sections {
        let Some(entries) = payload.get(VIDEO_LIST_FIELD).and_then(|v| v.as_array()) else {
            continue;
        };
        if entries.len() > limits.max_video_entries {
            return Err(ApiError::Validation(format!(
                "{}.{} has more than {} entries",
                key, VIDEO_LIST_FIELD, limits.max_video_entries
            )));
        }
    }
    Ok(())
}

/// Resolve sections, order and video embeds for a tenant profile.
///
/// POST /api/v1/render-plan
pub async fn create_render_plan(
    State(state): State<AppState>,
    payload: Result<Json<RenderPlanRequest>, JsonRejection>,
) -> Result<Json<RenderPlan>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    check_video_limits(&request.sections, &state.config.limits)?;
    let hint = decode_hint(request.section_order.as_ref());

    let template = find_template(&state, &request.business_type)?;
    let plan = build_render_plan_with_limit(
        template,
        &request.sections,
        hint.as_ref(),
        state.config.limits.max_embed_length,
    );

    for embed in plan.sections().filter_map(|s| s.videos.as_ref()).flatten() {
        record_embed_extraction(embed.platform());
    }
    record_render_plan(plan.main.len() + plan.trailing.len());

    Ok(Json(plan))
}

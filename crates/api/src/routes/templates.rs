//! Business template catalog endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{BusinessTemplate, BusinessTemplateSummary};
use serde::Serialize;

use super::find_template;
use crate::app::AppState;
use crate::error::ApiError;

/// Response for template listing.
#[derive(Debug, Serialize)]
pub struct ListTemplatesResponse {
    pub templates: Vec<BusinessTemplateSummary>,
    pub total: usize,
}

/// List every business template in the catalog.
///
/// GET /api/v1/templates
pub async fn list_templates(State(state): State<AppState>) -> Json<ListTemplatesResponse> {
    let templates = state.catalog.summaries();
    Json(ListTemplatesResponse {
        total: templates.len(),
        templates,
    })
}

/// Get the full section schema of one business type.
///
/// GET /api/v1/templates/:business_type
pub async fn get_template(
    State(state): State<AppState>,
    Path(business_type): Path<String>,
) -> Result<Json<BusinessTemplate>, ApiError> {
    find_template(&state, &business_type).cloned().map(Json)
}

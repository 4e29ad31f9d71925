//! HTTP route handlers.

pub mod embeds;
pub mod health;
pub mod render_plan;
pub mod sections;
pub mod templates;

use domain::models::BusinessTemplate;

use crate::app::AppState;
use crate::error::ApiError;

/// Look up a catalog template, mapping a miss to 404.
fn find_template<'a>(
    state: &'a AppState,
    business_type: &str,
) -> Result<&'a BusinessTemplate, ApiError> {
    state.catalog.get(business_type).ok_or_else(|| {
        ApiError::NotFound(format!("Unknown business type: {}", business_type))
    })
}

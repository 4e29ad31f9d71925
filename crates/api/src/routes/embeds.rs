//! Embed extraction endpoint.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use domain::models::{ExtractedVideoDescriptor, VideoEmbed, VideoEntry};
use domain::services::{extract_video_url, plan_video_embed};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_embed_extraction;

/// Request to classify one tenant embed field.
#[derive(Debug, Deserialize, Validate)]
pub struct ExtractEmbedRequest {
    /// Raw iframe HTML or a bare URL
    #[validate(length(min = 1, message = "embed_url must not be empty"))]
    pub embed_url: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractEmbedResponse {
    /// None when nothing usable was found
    pub descriptor: Option<ExtractedVideoDescriptor>,
    pub embed: VideoEmbed,
}

/// Reject embed fields above the configured size.
fn check_embed_length(embed: &str, max_len: usize) -> Result<(), ApiError> {
    if embed.len() > max_len {
        return Err(ApiError::Validation(format!(
            "embed_url exceeds {} bytes",
            max_len
        )));
    }
    Ok(())
}

/// Classify an embed field and plan how it is rendered.
///
/// POST /api/v1/embeds/extract
pub async fn extract_embed(
    State(state): State<AppState>,
    payload: Result<Json<ExtractEmbedRequest>, JsonRejection>,
) -> Result<Json<ExtractEmbedResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    check_embed_length(&request.embed_url, state.config.limits.max_embed_length)?;

    let descriptor = extract_video_url(&request.embed_url);
    record_embed_extraction(descriptor.as_ref().map(|d| d.platform));

    let embed = plan_video_embed(&VideoEntry::with_embed(request.embed_url));

    Ok(Json(ExtractEmbedResponse { descriptor, embed }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_embed_length() {
        assert!(check_embed_length("https://youtu.be/abc", 64).is_ok());
        assert!(check_embed_length(&"x".repeat(65), 64).is_err());
    }

    #[test]
    fn test_request_rejects_empty_embed() {
        let request = ExtractEmbedRequest {
            embed_url: String::new(),
        };
        assert!(request.validate().is_err());
    }
}

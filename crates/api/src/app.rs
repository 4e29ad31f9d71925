use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{CatalogError, TemplateCatalog};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{CatalogConfig, Config};
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{embeds, health, render_plan, sections, templates};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<TemplateCatalog>,
}

/// Load the builtin templates, overlaid with the configured template file.
pub fn load_catalog(config: &CatalogConfig) -> Result<TemplateCatalog, CatalogError> {
    let mut catalog = TemplateCatalog::builtin()?;

    if let Some(path) = config.path.as_deref().filter(|p| !p.is_empty()) {
        let overlay = TemplateCatalog::from_path(path)?;
        tracing::info!(path = %path, templates = overlay.len(), "Loaded template file");
        catalog.merge(overlay);
    }

    Ok(catalog)
}

pub fn create_app(config: Config, catalog: TemplateCatalog) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        config: config.clone(),
        catalog: Arc::new(catalog),
    };

    // Allow any origin unless origins are configured
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let v1_routes = Router::new()
        .route("/api/v1/templates", get(templates::list_templates))
        .route(
            "/api/v1/templates/:business_type",
            get(templates::get_template),
        )
        .route("/api/v1/sections/order", post(sections::resolve_order))
        .route("/api/v1/sections/defaults", post(sections::apply_defaults))
        .route("/api/v1/embeds/extract", post(embeds::extract_embed))
        .route("/api/v1/render-plan", post(render_plan::create_render_plan));

    Router::new()
        .merge(public_routes)
        .merge(v1_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_catalog_builtin_only() {
        let catalog = load_catalog(&CatalogConfig::default()).unwrap();
        assert_eq!(catalog.len(), 7);
    }

    #[test]
    fn test_load_catalog_empty_path_is_ignored() {
        let config = CatalogConfig {
            path: Some(String::new()),
        };
        assert_eq!(load_catalog(&config).unwrap().len(), 7);
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let config = CatalogConfig {
            path: Some("/nonexistent/bizcard-templates.json".to_string()),
        };
        assert!(matches!(
            load_catalog(&config),
            Err(CatalogError::Io { .. })
        ));
    }
}

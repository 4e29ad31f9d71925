//! Common test utilities for integration tests.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; no
//! listener or external service is needed.

// Not every integration test binary uses every helper.
#![allow(dead_code)]

use axum::Router;
use bizcard_api::{
    app::{create_app, load_catalog},
    config::{CatalogConfig, Config, LimitsConfig, LoggingConfig, SecurityConfig, ServerConfig},
};

/// Test configuration with the builtin catalog and small limits.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Use random port
            request_timeout_secs: 30,
            max_body_size: 64 * 1024,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
        },
        catalog: CatalogConfig::default(),
        limits: LimitsConfig {
            max_embed_length: 2048,
            max_video_entries: 10,
        },
    }
}

/// Create a test application router.
pub fn create_test_app(config: Config) -> Router {
    let catalog = load_catalog(&config.catalog).expect("Failed to load builtin catalog");
    create_app(config, catalog)
}

/// Build a JSON POST request.
pub fn json_request(uri: &str, body: serde_json::Value) -> axum::http::Request<axum::body::Body> {
    use axum::{
        body::Body,
        http::{header, Method, Request},
    };

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a GET request.
pub fn get_request(uri: &str) -> axum::http::Request<axum::body::Body> {
    use axum::{
        body::Body,
        http::{Method, Request},
    };

    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

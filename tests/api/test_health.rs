// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Health probe and CORS behavior

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use phi_ratio_analyzer::api::{create_router, AppState};
use phi_ratio_analyzer::config::DEFAULT_CORS_ORIGINS;
use std::sync::Arc;
use tower::ServiceExt;

use crate::common::{sample_face, StubProvider};

fn router_with_origins(origins: &[&str]) -> Router {
    let origins: Vec<String> = origins.iter().map(|s| s.to_string()).collect();
    create_router(
        AppState::new(Arc::new(StubProvider::returning(sample_face()))),
        &origins,
    )
}

#[cfg(test)]
mod health_tests {
    use super::*;

    /// Test 1: GET /health
    #[tokio::test]
    async fn test_health_get() {
        let response = router_with_origins(DEFAULT_CORS_ORIGINS)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "Server is healthy" }));
    }

    /// Test 2: HEAD /health has a status but no body
    #[tokio::test]
    async fn test_health_head() {
        let response = router_with_origins(DEFAULT_CORS_ORIGINS)
            .oneshot(
                Request::builder()
                    .method(Method::HEAD)
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    /// Test 3: listed origins are echoed with credentials
    #[tokio::test]
    async fn test_cors_allowed_origin() {
        let response = router_with_origins(DEFAULT_CORS_ORIGINS)
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/analyze-phi-ratio")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    /// Test 4: unlisted origins get no allow-origin header
    #[tokio::test]
    async fn test_cors_rejected_origin() {
        let response = router_with_origins(DEFAULT_CORS_ORIGINS)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    /// Test 5: wildcard allows any origin
    #[tokio::test]
    async fn test_cors_wildcard() {
        let response = router_with_origins(&["*"])
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://anywhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}

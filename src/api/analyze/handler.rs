// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Phi ratio analysis handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{debug, info, warn};

use super::request::AnalyzeRequest;
use super::response::AnalyzeResponse;
use crate::analysis::{analyze, AnalysisError};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::image_utils::{decode_base64_payload, encode_jpeg_data_url};

/// POST /analyze-phi-ratio - Score facial proportions against phi
///
/// # Request
/// - `image_data`: base64 image or data URL (required)
///
/// # Response
/// - `success`: always `true`
/// - `results`: six ratio entries with `name`, `ratio`, `closeness_to_phi`
/// - `annotated_image`: JPEG data URL with the 68 landmarks marked
///
/// # Errors
/// - 400 Bad Request: invalid image, no face, multiple faces, detector
///   failure (including a panic inside the detector), an oversized or
///   unparseable body
/// - 500 Internal Server Error: JPEG encoding failed
pub async fn analyze_phi_ratio_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected analysis body: {}", rejection.body_text());
        ApiError::InvalidRequest(rejection.body_text())
    })?;

    let image_data = request.validate().map_err(|e| {
        warn!("Analysis validation failed: {}", e);
        e
    })?;

    let bytes = decode_base64_payload(image_data).map_err(|e| {
        warn!("Failed to decode image payload: {}", e);
        ApiError::from(AnalysisError::from(e))
    })?;
    debug!("Analysis request received ({} bytes)", bytes.len());

    let provider = state.provider.clone();
    let report = tokio::task::spawn_blocking(move || analyze(provider.as_ref(), &bytes))
        .await
        .unwrap_or_else(|e| {
            // A panicking detector is still a detection failure
            Err(AnalysisError::Unexpected(e.to_string()))
        })
        .map_err(|e| {
            match &e {
                AnalysisError::Decode(detail) | AnalysisError::Unexpected(detail) => {
                    warn!(kind = e.kind(), "Analysis failed: {}", detail)
                }
                _ => info!(kind = e.kind(), "Analysis rejected: {}", e),
            }
            ApiError::from(e)
        })?;

    let annotated_image = encode_jpeg_data_url(&report.annotated_image).map_err(|e| {
        warn!("Failed to encode annotated image: {}", e);
        ApiError::InternalError(e.to_string())
    })?;

    Ok(Json(AnalyzeResponse::new(report.results, annotated_image)))
}

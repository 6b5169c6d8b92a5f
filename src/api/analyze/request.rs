// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analysis request types and validation

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisError;
use crate::api::errors::ApiError;

/// Maximum encoded payload length (a 10MB image plus base64 overhead)
pub const MAX_ENCODED_IMAGE_SIZE: usize = 14 * 1024 * 1024;

/// Request for phi ratio analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64 image, optionally as a `data:<mime>;base64,` URL
    #[serde(default)]
    pub image_data: Option<String>,
}

impl AnalyzeRequest {
    pub fn new(image_data: impl Into<String>) -> Self {
        Self {
            image_data: Some(image_data.into()),
        }
    }

    /// Missing or blank data is reported like any other undecodable image
    pub fn validate(&self) -> Result<&str, ApiError> {
        let image_data = self
            .image_data
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ApiError::from(AnalysisError::Decode("image_data is empty".to_string()))
            })?;

        if image_data.len() > MAX_ENCODED_IMAGE_SIZE {
            return Err(ApiError::ValidationError {
                field: "image_data".to_string(),
                message: format!(
                    "image_data exceeds maximum size of {} bytes",
                    MAX_ENCODED_IMAGE_SIZE
                ),
            });
        }

        Ok(image_data)
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-shot analysis: decode, detect, score, annotate
//!
//! Every failure is surfaced to the caller with its reason. Compare
//! [`super::stream`], which folds the same failures into empty results.

use image::DynamicImage;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use super::annotate::annotate;
use super::landmarks::LandmarkSet;
use super::ratios::{calculate_ratios, RatioResult};
use crate::vision::image_utils::{decode_image_bytes, ImageError};
use crate::vision::provider::{DetectionError, LandmarkProvider};

/// Classified single-shot failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Bytes could not be decoded as an image; the inner string is for logs
    #[error("Invalid image data.")]
    Decode(String),

    #[error("No face was detected in the provided image.")]
    NoFace,

    #[error("Multiple faces were detected. Please provide an image with one face.")]
    MultipleFaces,

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl AnalysisError {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Decode(_) => "invalid_image",
            AnalysisError::NoFace => "no_face",
            AnalysisError::MultipleFaces => "multiple_faces",
            AnalysisError::Unexpected(_) => "unexpected_error",
        }
    }
}

impl From<DetectionError> for AnalysisError {
    fn from(err: DetectionError) -> Self {
        match err {
            DetectionError::NoFace => AnalysisError::NoFace,
            DetectionError::MultipleFaces => AnalysisError::MultipleFaces,
            DetectionError::Unexpected(detail) => AnalysisError::Unexpected(detail),
        }
    }
}

impl From<ImageError> for AnalysisError {
    fn from(err: ImageError) -> Self {
        AnalysisError::Decode(err.to_string())
    }
}

/// Successful single-shot result
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub results: Vec<RatioResult>,
    pub landmarks: LandmarkSet,
    pub annotated_image: DynamicImage,
}

/// Analyze raw image bytes
pub fn analyze(
    provider: &dyn LandmarkProvider,
    image_bytes: &[u8],
) -> Result<AnalysisReport, AnalysisError> {
    let (image, info) = decode_image_bytes(image_bytes)?;
    debug!(
        "Decoded {}x{} {:?} image ({} bytes)",
        info.width, info.height, info.format, info.size_bytes
    );
    analyze_image(provider, &image)
}

/// Analyze an already decoded image
///
/// Detection failures stop the pipeline before any ratio or annotation
/// work is done.
pub fn analyze_image(
    provider: &dyn LandmarkProvider,
    image: &DynamicImage,
) -> Result<AnalysisReport, AnalysisError> {
    let start = Instant::now();

    let landmarks = provider.detect(image)?;
    let results = calculate_ratios(&landmarks);
    let annotated_image = annotate(image, &landmarks);

    info!(
        provider = provider.name(),
        ratios = results.len(),
        "Phi ratio analysis completed in {}ms",
        start.elapsed().as_millis()
    );

    Ok(AnalysisReport {
        results,
        landmarks,
        annotated_image,
    })
}

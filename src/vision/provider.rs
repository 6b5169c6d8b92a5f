// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Landmark provider capability
//!
//! Analysis code only sees this trait. Which detector sits behind it (the
//! ONNX pipeline in [`crate::vision::face`], or a stub in tests) is decided
//! once at startup.

use image::DynamicImage;
use thiserror::Error;

use crate::analysis::landmarks::LandmarkSet;

/// Classified detection failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionError {
    #[error("No face was detected in the provided image.")]
    NoFace,

    #[error("Multiple faces were detected. Please provide an image with one face.")]
    MultipleFaces,

    #[error("{0}")]
    Unexpected(String),
}

impl DetectionError {
    /// Short machine-readable kind, used in error bodies and logs
    pub fn kind(&self) -> &'static str {
        match self {
            DetectionError::NoFace => "no_face",
            DetectionError::MultipleFaces => "multiple_faces",
            DetectionError::Unexpected(_) => "unexpected_error",
        }
    }
}

impl From<anyhow::Error> for DetectionError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the context chain on one line
        DetectionError::Unexpected(format!("{:#}", err))
    }
}

/// Source of 68-point landmarks for exactly one face
///
/// `detect` is synchronous and may be slow; async callers should run it on
/// the blocking pool. It must not retain or modify the image.
pub trait LandmarkProvider: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> Result<LandmarkSet, DetectionError>;

    /// Human-readable name for logs
    fn name(&self) -> &str {
        "landmark-provider"
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process-wide landmark model state
//!
//! Lifecycle: built once in `main` before the listener binds, shared
//! read-only through `Arc`, never reloaded and never torn down. A missing
//! or unloadable model file is an error from [`VisionModelManager::load`],
//! and the binaries treat that error as fatal.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::face::detection::{DEFAULT_IOU_THRESHOLD, DEFAULT_SCORE_THRESHOLD};
use super::face::OnnxLandmarkProvider;
use super::provider::LandmarkProvider;

/// Paths and tuning for the landmark models
#[derive(Debug, Clone)]
pub struct VisionModelConfig {
    pub face_detector_path: PathBuf,
    pub landmark_model_path: PathBuf,
    pub score_threshold: f32,
    pub iou_threshold: f32,
}

impl Default for VisionModelConfig {
    fn default() -> Self {
        Self {
            face_detector_path: PathBuf::from("./models/version-RFB-320.onnx"),
            landmark_model_path: PathBuf::from("./models/pfld-68.onnx"),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
        }
    }
}

/// Information about a loaded vision model
#[derive(Debug, Clone)]
pub struct VisionModelInfo {
    pub name: String,
    pub model_type: String,
    pub path: PathBuf,
}

pub struct VisionModelManager {
    provider: Arc<dyn LandmarkProvider>,
    models: Vec<VisionModelInfo>,
}

impl std::fmt::Debug for VisionModelManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionModelManager")
            .field("provider", &self.provider.name())
            .field("models", &self.models)
            .finish()
    }
}

impl VisionModelManager {
    /// Load the ONNX landmark pipeline
    ///
    /// Unlike optional models elsewhere, nothing here degrades gracefully:
    /// the service cannot analyze anything without both files.
    pub fn load(config: &VisionModelConfig) -> Result<Self> {
        let provider = OnnxLandmarkProvider::load(
            &config.face_detector_path,
            &config.landmark_model_path,
        )
        .context("Failed to initialize landmark provider")?
        .with_thresholds(config.score_threshold, config.iou_threshold);

        info!(
            "✅ Landmark models loaded (score threshold {:.2}, IoU threshold {:.2})",
            config.score_threshold, config.iou_threshold
        );

        let models = vec![
            VisionModelInfo {
                name: "ultraface-rfb-320".to_string(),
                model_type: "face-detection".to_string(),
                path: config.face_detector_path.clone(),
            },
            VisionModelInfo {
                name: "pfld-68".to_string(),
                model_type: "face-landmarks".to_string(),
                path: config.landmark_model_path.clone(),
            },
        ];

        Ok(Self {
            provider: Arc::new(provider),
            models,
        })
    }

    /// Wrap an already constructed provider
    pub fn from_provider(provider: Arc<dyn LandmarkProvider>) -> Self {
        Self {
            provider,
            models: Vec::new(),
        }
    }

    pub fn provider(&self) -> Arc<dyn LandmarkProvider> {
        self.provider.clone()
    }

    pub fn list_models(&self) -> &[VisionModelInfo] {
        &self.models
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Two-stage ONNX landmark provider: face detection, then landmark regression

use anyhow::Result;
use image::{DynamicImage, GenericImageView};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use super::detection::{FaceBox, FaceDetectionModel};
use super::landmark_model::LandmarkModel;
use super::preprocessing::{preprocess_for_detection, preprocess_for_landmarks, CropRegion};
use crate::analysis::landmarks::{LandmarkSet, Point};
use crate::vision::provider::{DetectionError, LandmarkProvider};

/// Classify post-NMS detections into exactly one face or an error
pub fn single_face(faces: &[FaceBox]) -> Result<FaceBox, DetectionError> {
    match faces {
        [] => Err(DetectionError::NoFace),
        [face] => Ok(*face),
        _ => Err(DetectionError::MultipleFaces),
    }
}

/// Map crop-normalized predictions to frame pixels
pub fn landmarks_in_frame(
    region: &CropRegion,
    normalized: &[(f32, f32)],
) -> Result<LandmarkSet, DetectionError> {
    let points = normalized
        .iter()
        .map(|&(nx, ny)| {
            let (x, y) = region.to_frame(nx, ny);
            Point::new(x, y)
        })
        .collect();
    LandmarkSet::new(points).map_err(|e| DetectionError::Unexpected(e.to_string()))
}

#[derive(Debug, Clone)]
pub struct OnnxLandmarkProvider {
    detector: FaceDetectionModel,
    landmarks: LandmarkModel,
}

impl OnnxLandmarkProvider {
    pub fn new(detector: FaceDetectionModel, landmarks: LandmarkModel) -> Self {
        Self {
            detector,
            landmarks,
        }
    }

    /// Load both models from disk
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(detector_path: P, landmark_path: Q) -> Result<Self> {
        let detector = FaceDetectionModel::new(detector_path)?;
        let landmarks = LandmarkModel::new(landmark_path)?;
        Ok(Self::new(detector, landmarks))
    }

    pub fn with_thresholds(mut self, score_threshold: f32, iou_threshold: f32) -> Self {
        self.detector = self
            .detector
            .with_score_threshold(score_threshold)
            .with_iou_threshold(iou_threshold);
        self
    }

    pub fn detector(&self) -> &FaceDetectionModel {
        &self.detector
    }
}

impl LandmarkProvider for OnnxLandmarkProvider {
    fn detect(&self, image: &DynamicImage) -> Result<LandmarkSet, DetectionError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        let faces = self.detector.detect(&preprocess_for_detection(image))?;
        let face = single_face(&faces)?;

        let region = CropRegion::around_face(&face, width, height).ok_or_else(|| {
            DetectionError::Unexpected("Detected face lies outside the image".to_string())
        })?;

        let normalized = self
            .landmarks
            .predict(&preprocess_for_landmarks(image, &region))?;
        let landmarks = landmarks_in_frame(&region, &normalized)?;

        debug!(
            "Landmarks for {}x{} frame in {}ms (face score {:.2})",
            width,
            height,
            start.elapsed().as_millis(),
            face.score
        );

        Ok(landmarks)
    }

    fn name(&self) -> &str {
        "onnx-ultraface-pfld68"
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Landmark model loading (init-once, fatal on missing assets)

use phi_ratio_analyzer::vision::face::{FaceDetectionModel, LandmarkModel};
use phi_ratio_analyzer::vision::{VisionModelConfig, VisionModelManager};
use phi_ratio_analyzer::{analyze, AnalysisError, LandmarkProvider};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::common::{png_bytes, sample_face, StubProvider};

fn configured_models() -> VisionModelConfig {
    let defaults = VisionModelConfig::default();
    VisionModelConfig {
        face_detector_path: std::env::var("FACE_DETECTOR_MODEL")
            .map(PathBuf::from)
            .unwrap_or(defaults.face_detector_path),
        landmark_model_path: std::env::var("LANDMARK_MODEL")
            .map(PathBuf::from)
            .unwrap_or(defaults.landmark_model_path),
        ..defaults
    }
}

fn models_present(config: &VisionModelConfig) -> bool {
    Path::new(&config.face_detector_path).exists() && Path::new(&config.landmark_model_path).exists()
}

#[cfg(test)]
mod model_manager_tests {
    use super::*;

    /// Test 1: missing detector is an error, not a degraded manager
    #[test]
    fn test_missing_detector_is_fatal() {
        let config = VisionModelConfig {
            face_detector_path: PathBuf::from("/nonexistent/version-RFB-320.onnx"),
            ..configured_models()
        };
        let err = VisionModelManager::load(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("Face detection model not found"));
    }

    /// Test 2: a file that is not an ONNX graph fails to load
    #[test]
    fn test_corrupt_model_rejected() {
        let mut file = tempfile::Builder::new().suffix(".onnx").tempfile().unwrap();
        file.write_all(b"this is not a protobuf").unwrap();

        let err = FaceDetectionModel::new(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load face detection model"));

        let err = LandmarkModel::new(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load landmark model"));
    }

    /// Test 3: a wrapped provider is shared, not copied
    #[test]
    fn test_from_provider_shares_instance() {
        let stub = Arc::new(StubProvider::returning(sample_face()));
        let manager = VisionModelManager::from_provider(stub.clone());
        assert!(manager.list_models().is_empty());
        assert_eq!(manager.provider().name(), "stub");

        analyze(manager.provider().as_ref(), &png_bytes(32, 32)).unwrap();
        assert_eq!(stub.calls(), 1);
    }

    /// Test 4: real models load and find no face in a flat image
    #[test]
    #[ignore] // Requires model files under ./models (or FACE_DETECTOR_MODEL / LANDMARK_MODEL)
    fn test_real_models_blank_image() {
        let config = configured_models();
        if !models_present(&config) {
            eprintln!("Skipping: landmark models not available");
            return;
        }

        let manager = VisionModelManager::load(&config).unwrap();
        assert_eq!(manager.list_models().len(), 2);
        assert_eq!(manager.provider().name(), "onnx-ultraface-pfld68");

        let err = analyze(manager.provider().as_ref(), &png_bytes(320, 240)).unwrap_err();
        assert_eq!(err, AnalysisError::NoFace);
    }

    /// Test 5: real models on a face photo, if one is provided
    #[test]
    #[ignore] // Requires models and PHI_TEST_FACE pointing at a single-face photo
    fn test_real_models_face_photo() {
        let config = configured_models();
        let Ok(photo) = std::env::var("PHI_TEST_FACE") else {
            eprintln!("Skipping: PHI_TEST_FACE not set");
            return;
        };
        if !models_present(&config) {
            eprintln!("Skipping: landmark models not available");
            return;
        }

        let manager = VisionModelManager::load(&config).unwrap();
        let bytes = std::fs::read(photo).unwrap();
        let report = analyze(manager.provider().as_ref(), &bytes).unwrap();

        assert_eq!(report.results.len(), 6);
        let (w, h) = (report.annotated_image.width() as i32, report.annotated_image.height() as i32);
        let inside = report
            .landmarks
            .iter()
            .filter(|p| p.x >= 0 && p.y >= 0 && p.x < w && p.y < h)
            .count();
        assert!(inside > 60, "most landmarks should fall inside the frame");
    }
}

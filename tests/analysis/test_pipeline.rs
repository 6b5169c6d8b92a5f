// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Single-shot pipeline: decode, detect, score, annotate

use crate::common::{png_bytes, sample_face, StubProvider};
use image::Rgb;
use phi_ratio_analyzer::analysis::annotate::MARKER_COLOR;
use phi_ratio_analyzer::{analyze, AnalysisError, DetectionError};

#[cfg(test)]
mod pipeline_tests {
    use super::*;

    /// Test 1: success yields ratios, landmarks and an annotated copy
    #[test]
    fn test_full_pipeline() {
        let provider = StubProvider::returning(sample_face());
        let report = analyze(&provider, &png_bytes(200, 240)).unwrap();

        assert_eq!(provider.calls(), 1);
        assert_eq!(report.results.len(), 6);
        assert_eq!(report.landmarks, sample_face());

        let annotated = report.annotated_image.to_rgb8();
        assert_eq!((annotated.width(), annotated.height()), (200, 240));
        for p in report.landmarks.iter() {
            assert_eq!(*annotated.get_pixel(p.x as u32, p.y as u32), MARKER_COLOR);
        }
    }

    /// Test 2: undecodable bytes never reach the provider
    #[test]
    fn test_decode_error_skips_detection() {
        let provider = StubProvider::returning(sample_face());
        let err = analyze(&provider, &[0x00, 0x01, 0x02, 0x03, 0x04]).unwrap_err();

        assert!(matches!(err, AnalysisError::Decode(_)));
        assert_eq!(err.to_string(), "Invalid image data.");
        assert_eq!(provider.calls(), 0);
    }

    /// Test 3: truncated PNG is a decode error too
    #[test]
    fn test_truncated_png() {
        let provider = StubProvider::returning(sample_face());
        let bytes = png_bytes(50, 50);
        let err = analyze(&provider, &bytes[..20]).unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)));
    }

    /// Test 4: no face
    #[test]
    fn test_no_face() {
        let provider = StubProvider::failing(DetectionError::NoFace);
        let err = analyze(&provider, &png_bytes(64, 64)).unwrap_err();
        assert_eq!(err, AnalysisError::NoFace);
        assert_eq!(
            err.to_string(),
            "No face was detected in the provided image."
        );
    }

    /// Test 5: multiple faces stop before scoring and annotation
    #[test]
    fn test_multiple_faces() {
        let provider = StubProvider::failing(DetectionError::MultipleFaces);
        let err = analyze(&provider, &png_bytes(64, 64)).unwrap_err();
        assert_eq!(err, AnalysisError::MultipleFaces);
        assert!(err.to_string().contains("Multiple faces"));
    }

    /// Test 6: detector runtime failure keeps its detail
    #[test]
    fn test_unexpected_detection_error() {
        let provider =
            StubProvider::failing(DetectionError::Unexpected("inference failed".to_string()));
        let err = analyze(&provider, &png_bytes(64, 64)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "An unexpected error occurred: inference failed"
        );
    }

    /// Test 7: the decoded input is left untouched
    #[test]
    fn test_background_preserved() {
        let provider = StubProvider::returning(sample_face());
        let report = analyze(&provider, &png_bytes(200, 240)).unwrap();
        // Far from every marker
        assert_eq!(
            *report.annotated_image.to_rgb8().get_pixel(199, 0),
            Rgb([120, 110, 100])
        );
    }
}

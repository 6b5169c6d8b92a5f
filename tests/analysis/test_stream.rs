// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Per-frame stream processing without a socket

use crate::common::{png_base64, png_bytes, png_data_url, sample_face, ScriptedProvider, StubProvider};
use phi_ratio_analyzer::analysis::{process_frame, StreamFrame};
use phi_ratio_analyzer::DetectionError;

#[cfg(test)]
mod stream_tests {
    use super::*;

    /// Test 1: a failed frame yields empty landmarks and the next frame is served
    #[test]
    fn test_failure_then_success() {
        let provider = ScriptedProvider::new(vec![
            Err(DetectionError::MultipleFaces),
            Ok(sample_face()),
        ]);
        let frame = png_data_url(32, 32);

        let first = process_frame(&provider, StreamFrame::Text(&frame)).unwrap();
        assert!(first.landmarks.is_empty());

        let second = process_frame(&provider, StreamFrame::Text(&frame)).unwrap();
        assert_eq!(second.landmarks.len(), 68);
        assert_eq!(second.landmarks[..], sample_face().points()[..]);
    }

    /// Test 2: undecodable frames are skipped
    #[test]
    fn test_garbage_frame_skipped() {
        let provider = StubProvider::returning(sample_face());
        assert!(process_frame(&provider, StreamFrame::Text("not base64 at all!")).is_none());
        assert!(process_frame(&provider, StreamFrame::Text("aGVsbG8gd29ybGQ=")).is_none());
        assert!(process_frame(&provider, StreamFrame::Binary(b"GIF")).is_none());
        assert_eq!(provider.calls(), 0);
    }

    /// Test 3: plain base64 and raw binary frames
    #[test]
    fn test_frame_encodings() {
        let provider = StubProvider::returning(sample_face());
        let plain = png_base64(16, 16);
        assert_eq!(
            process_frame(&provider, StreamFrame::Text(&plain))
                .unwrap()
                .landmarks
                .len(),
            68
        );
        let raw = png_bytes(16, 16);
        assert_eq!(
            process_frame(&provider, StreamFrame::Binary(&raw))
                .unwrap()
                .landmarks
                .len(),
            68
        );
        assert_eq!(provider.calls(), 2);
    }

    /// Test 4: every detection failure folds to empty
    #[test]
    fn test_all_failures_fold() {
        let frame = png_base64(16, 16);
        for err in [
            DetectionError::NoFace,
            DetectionError::MultipleFaces,
            DetectionError::Unexpected("poisoned".to_string()),
        ] {
            let provider = StubProvider::failing(err);
            let reply = process_frame(&provider, StreamFrame::Text(&frame)).unwrap();
            assert_eq!(serde_json::to_string(&reply).unwrap(), r#"{"landmarks":[]}"#);
        }
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-frame logic for the realtime landmark stream
//!
//! Lenient by contract: a frame that cannot be decoded gets no reply, and
//! any detection failure becomes `{"landmarks": []}`. Nothing here can end
//! the stream.

use serde::Serialize;
use tracing::debug;

use super::landmarks::{LandmarkSet, Point};
use crate::vision::image_utils::{decode_base64_payload, decode_image_bytes};
use crate::vision::provider::{DetectionError, LandmarkProvider};

/// One inbound frame as received from the socket
#[derive(Debug, Clone, Copy)]
pub enum StreamFrame<'a> {
    /// Base64 or data-URL encoded image
    Text(&'a str),
    /// Raw encoded image bytes
    Binary(&'a [u8]),
}

/// Outbound stream message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LandmarksMessage {
    pub landmarks: Vec<Point>,
}

impl LandmarksMessage {
    pub fn empty() -> Self {
        Self {
            landmarks: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

impl From<&LandmarkSet> for LandmarksMessage {
    fn from(set: &LandmarkSet) -> Self {
        Self {
            landmarks: set.points().to_vec(),
        }
    }
}

/// Fold a detection outcome into a stream reply; every failure is empty
pub fn lenient_response(outcome: Result<LandmarkSet, DetectionError>) -> LandmarksMessage {
    match outcome {
        Ok(set) => LandmarksMessage::from(&set),
        Err(e) => {
            debug!("Frame yielded no landmarks ({}): {}", e.kind(), e);
            LandmarksMessage::empty()
        }
    }
}

/// Process one frame; `None` means the frame is skipped without a reply
pub fn process_frame(
    provider: &dyn LandmarkProvider,
    frame: StreamFrame<'_>,
) -> Option<LandmarksMessage> {
    let decoded = match frame {
        StreamFrame::Text(text) => {
            decode_base64_payload(text).and_then(|bytes| decode_image_bytes(&bytes))
        }
        StreamFrame::Binary(bytes) => decode_image_bytes(bytes),
    };

    let (image, _info) = match decoded {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!("Skipping undecodable frame: {}", e);
            return None;
        }
    };

    Some(lenient_response(provider.detect(&image)))
}

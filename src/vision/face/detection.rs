// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Face detection model (UltraFace RFB-320 ONNX)
//!
//! Produces normalized face boxes for a frame. Only the number of faces and
//! the box of a lone face matter downstream, so post-processing is a score
//! threshold followed by greedy NMS.

use anyhow::{Context, Result};
use ndarray::{Array4, ArrayViewD, IxDyn};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::preprocessing::{DETECTOR_INPUT_HEIGHT, DETECTOR_INPUT_WIDTH};

/// Default minimum face score
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.7;

/// Default IoU above which overlapping boxes are merged
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.3;

/// Face box in coordinates normalized to the frame (0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub score: f32,
}

impl FaceBox {
    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    pub fn iou(&self, other: &FaceBox) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);

        let intersection = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

/// Greedy non-maximum suppression, highest score first
pub fn non_max_suppression(mut boxes: Vec<FaceBox>, iou_threshold: f32) -> Vec<FaceBox> {
    boxes.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<FaceBox> = Vec::new();
    for candidate in boxes {
        if kept.iter().all(|k| k.iou(&candidate) <= iou_threshold) {
            kept.push(candidate);
        }
    }
    kept
}

/// Parse raw `scores [1,N,2]` and `boxes [1,N,4]` outputs
pub fn parse_detections(
    scores: ArrayViewD<f32>,
    boxes: ArrayViewD<f32>,
    score_threshold: f32,
) -> Result<Vec<FaceBox>> {
    let s_shape = scores.shape();
    let b_shape = boxes.shape();
    if s_shape.len() != 3 || s_shape[2] != 2 || b_shape.len() != 3 || b_shape[2] != 4 {
        anyhow::bail!(
            "Unexpected detector output shapes: scores {:?}, boxes {:?}",
            s_shape,
            b_shape
        );
    }
    if s_shape[1] != b_shape[1] {
        anyhow::bail!(
            "Detector anchor count mismatch: {} scores vs {} boxes",
            s_shape[1],
            b_shape[1]
        );
    }

    let mut candidates = Vec::new();
    for i in 0..s_shape[1] {
        // Column 1 is the face class
        let score = scores[IxDyn(&[0, i, 1])];
        if score < score_threshold {
            continue;
        }
        let face = FaceBox {
            x1: boxes[IxDyn(&[0, i, 0])],
            y1: boxes[IxDyn(&[0, i, 1])],
            x2: boxes[IxDyn(&[0, i, 2])],
            y2: boxes[IxDyn(&[0, i, 3])],
            score,
        };
        if face.is_valid() {
            candidates.push(face);
        }
    }

    Ok(candidates)
}

/// UltraFace face detector
///
/// CPU-only ONNX session. The session needs exclusive access to run, so it
/// sits behind a mutex.
#[derive(Clone)]
pub struct FaceDetectionModel {
    session: Arc<Mutex<Session>>,
    input_name: String,
    score_threshold: f32,
    iou_threshold: f32,
}

impl std::fmt::Debug for FaceDetectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceDetectionModel")
            .field("input_name", &self.input_name)
            .field("score_threshold", &self.score_threshold)
            .field("iou_threshold", &self.iou_threshold)
            .finish_non_exhaustive()
    }
}

impl FaceDetectionModel {
    /// Load the detector from an ONNX file
    ///
    /// # Errors
    /// Returns error if the file is missing or ONNX Runtime rejects it.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Face detection model not found: {}", model_path.display());
        }

        info!("Loading face detection model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load face detection model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "input".to_string());

        if session.outputs.len() < 2 {
            anyhow::bail!(
                "Face detection model must have scores and boxes outputs, found {}",
                session.outputs.len()
            );
        }

        debug!("Face detector loaded - input: {}", input_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
        })
    }

    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_iou_threshold(mut self, threshold: f32) -> Self {
        self.iou_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn score_threshold(&self) -> f32 {
        self.score_threshold
    }

    pub fn iou_threshold(&self) -> f32 {
        self.iou_threshold
    }

    /// Detect faces in a preprocessed `[1, 3, 240, 320]` tensor
    pub fn detect(&self, input: &Array4<f32>) -> Result<Vec<FaceBox>> {
        let shape = input.shape();
        let expected = [
            1,
            3,
            DETECTOR_INPUT_HEIGHT as usize,
            DETECTOR_INPUT_WIDTH as usize,
        ];
        if shape != expected.as_slice() {
            anyhow::bail!(
                "Invalid detector input shape: {:?}, expected [1, 3, {}, {}]",
                shape,
                DETECTOR_INPUT_HEIGHT,
                DETECTOR_INPUT_WIDTH
            );
        }

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Face detection session lock poisoned"))?;

        let input_value =
            Value::from_array(input.to_owned()).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Face detection inference failed")?;

        let scores = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract scores tensor")?;
        let boxes = outputs[1]
            .try_extract_array::<f32>()
            .context("Failed to extract boxes tensor")?;

        let candidates = parse_detections(scores.view(), boxes.view(), self.score_threshold)?;
        let faces = non_max_suppression(candidates, self.iou_threshold);

        debug!("Detected {} face(s)", faces.len());

        Ok(faces)
    }
}

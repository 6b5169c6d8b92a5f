// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! 68-point landmark regressor (PFLD-style ONNX)
//!
//! Takes a 112x112 face crop and predicts 68 (x, y) pairs normalized to
//! the crop. Some exports carry an auxiliary head (pose features) as an
//! extra output, so the landmark tensor is picked by its length.

use anyhow::{Context, Result};
use ndarray::Array4;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::preprocessing::LANDMARK_INPUT_SIZE;
use crate::analysis::landmarks::LANDMARK_COUNT;

/// Flattened length of the landmark output
pub const LANDMARK_OUTPUT_LEN: usize = LANDMARK_COUNT * 2;

/// Split a flat `[x0, y0, x1, y1, ...]` slice into pairs
pub fn parse_landmark_output(values: &[f32]) -> Result<Vec<(f32, f32)>> {
    if values.len() != LANDMARK_OUTPUT_LEN {
        anyhow::bail!(
            "Landmark output has {} values, expected {}",
            values.len(),
            LANDMARK_OUTPUT_LEN
        );
    }
    if values.iter().any(|v| !v.is_finite()) {
        anyhow::bail!("Landmark output contains non-finite values");
    }

    Ok(values.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect())
}

#[derive(Clone)]
pub struct LandmarkModel {
    session: Arc<Mutex<Session>>,
    input_name: String,
}

impl std::fmt::Debug for LandmarkModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LandmarkModel")
            .field("input_name", &self.input_name)
            .finish_non_exhaustive()
    }
}

impl LandmarkModel {
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Landmark model not found: {}", model_path.display());
        }

        info!("Loading landmark model from {}", model_path.display());

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
                "Failed to load landmark model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "input".to_string());

        debug!(
            "Landmark model loaded - input: {}, outputs: {}",
            input_name,
            session.outputs.len()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
        })
    }

    /// Predict crop-normalized landmarks from a `[1, 3, 112, 112]` tensor
    pub fn predict(&self, input: &Array4<f32>) -> Result<Vec<(f32, f32)>> {
        let size = LANDMARK_INPUT_SIZE as usize;
        if input.shape() != [1, 3, size, size].as_slice() {
            anyhow::bail!(
                "Invalid landmark input shape: {:?}, expected [1, 3, {}, {}]",
                input.shape(),
                size,
                size
            );
        }

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Landmark session lock poisoned"))?;

        let input_value =
            Value::from_array(input.to_owned()).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Landmark inference failed")?;

        for index in 0..outputs.len() {
            let tensor = outputs[index]
                .try_extract_array::<f32>()
                .context("Failed to extract landmark tensor")?;
            if tensor.len() == LANDMARK_OUTPUT_LEN {
                let values: Vec<f32> = tensor.iter().copied().collect();
                return parse_landmark_output(&values);
            }
        }

        anyhow::bail!(
            "Landmark model produced no output with {} values",
            LANDMARK_OUTPUT_LEN
        )
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX face landmark pipeline
//!
//! Components:
//! - `detection` - Face boxes (UltraFace RFB-320)
//! - `landmark_model` - 68-point regression on a face crop (PFLD-style)
//! - `preprocessing` - Tensor preparation for both models
//! - `model` - Combined [`LandmarkProvider`](crate::vision::LandmarkProvider)

pub mod detection;
pub mod landmark_model;
pub mod model;
pub mod preprocessing;

pub use detection::{FaceBox, FaceDetectionModel};
pub use landmark_model::LandmarkModel;
pub use model::OnnxLandmarkProvider;

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing: image transport and facial landmark detection
//!
//! Models run on CPU through ONNX Runtime and are loaded once at startup.

pub mod face;
pub mod image_utils;
pub mod model_manager;
pub mod provider;

pub use image_utils::{
    decode_base64_image, decode_image_bytes, detect_format, encode_jpeg_data_url, ImageError,
    ImageInfo,
};
pub use model_manager::{VisionModelConfig, VisionModelInfo, VisionModelManager};
pub use provider::{DetectionError, LandmarkProvider};

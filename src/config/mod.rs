// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process configuration
//!
//! Flags take precedence over environment variables, which may come from
//! a `.env` file loaded before parsing.

use clap::{Args, Parser};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::vision::model_manager::VisionModelConfig;

/// Origins allowed when `CORS_ORIGINS` is not set
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost",
    "https://phi-ratio-analyzer.onrender.com",
    "https://phi-ratio-analyzer.vercel.app",
];

/// Landmark model locations and detector tuning
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// UltraFace RFB-320 face detector (ONNX)
    #[arg(
        long,
        env = "FACE_DETECTOR_MODEL",
        default_value = "./models/version-RFB-320.onnx"
    )]
    pub face_detector_model: PathBuf,

    /// 68-point landmark regressor (ONNX)
    #[arg(long, env = "LANDMARK_MODEL", default_value = "./models/pfld-68.onnx")]
    pub landmark_model: PathBuf,

    /// Minimum face detection score
    #[arg(long, env = "FACE_SCORE_THRESHOLD", default_value_t = 0.7)]
    pub face_score_threshold: f32,

    /// IoU above which overlapping detections are merged
    #[arg(long, env = "FACE_IOU_THRESHOLD", default_value_t = 0.3)]
    pub face_iou_threshold: f32,
}

impl ModelArgs {
    pub fn to_model_config(&self) -> VisionModelConfig {
        VisionModelConfig {
            face_detector_path: self.face_detector_model.clone(),
            landmark_model_path: self.landmark_model.clone(),
            score_threshold: self.face_score_threshold,
            iou_threshold: self.face_iou_threshold,
        }
    }
}

/// Phi ratio analyzer server
#[derive(Parser, Debug, Clone)]
#[command(name = "phi-ratio-analyzer")]
#[command(about = "Golden ratio face analysis server", long_about = None)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "APP_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to bind
    #[arg(long, env = "APP_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Comma-separated CORS origins; `*` allows any origin
    #[arg(
        long,
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        default_values_t = DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect::<Vec<_>>()
    )]
    pub cors_origins: Vec<String>,

    #[command(flatten)]
    pub models: ModelArgs,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

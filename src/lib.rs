// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod version;
pub mod vision;

// Re-export main types
pub use analysis::{
    analyze, calculate_ratios, AnalysisError, AnalysisReport, LandmarkSet, Point, RatioResult,
};
pub use config::ServerConfig;
pub use vision::{DetectionError, LandmarkProvider, VisionModelManager};

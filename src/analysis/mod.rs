// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Phi ratio analysis
//!
//! Landmarks in, scored ratios and an annotated image out. The single-shot
//! path ([`pipeline`]) reports every failure; the streaming path
//! ([`stream`]) folds them into empty replies.

pub mod annotate;
pub mod landmarks;
pub mod pipeline;
pub mod ratios;
pub mod stream;

pub use annotate::annotate;
pub use landmarks::{LandmarkError, LandmarkSet, Point, LANDMARK_COUNT};
pub use pipeline::{analyze, analyze_image, AnalysisError, AnalysisReport};
pub use ratios::{calculate_ratios, closeness_to_phi, RatioResult, PHI, RATIO_CATALOG};
pub use stream::{process_frame, LandmarksMessage, StreamFrame};

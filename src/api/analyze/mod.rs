// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Phi ratio analysis endpoint
//!
//! Provides POST /analyze-phi-ratio for scoring a single face image.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::analyze_phi_ratio_handler;
pub use request::AnalyzeRequest;
pub use response::AnalyzeResponse;

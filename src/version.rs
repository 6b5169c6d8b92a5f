// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Phi Ratio Analyzer

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "phi-ratio-analysis",
    "annotated-image",
    "realtime-landmarks",
    "onnx-landmarks-68",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Phi Ratio Analyzer {} ({})", VERSION_NUMBER, FEATURES.join(", "))
}

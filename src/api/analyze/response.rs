// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analysis response types

use serde::{Deserialize, Serialize};

use crate::analysis::RatioResult;

/// Successful analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    /// One entry per catalog ratio, in catalog order
    pub results: Vec<RatioResult>,
    /// `data:image/jpeg;base64,...` with landmark markers drawn
    pub annotated_image: String,
}

impl AnalyzeResponse {
    pub fn new(results: Vec<RatioResult>, annotated_image: String) -> Self {
        Self {
            success: true,
            results,
            annotated_image,
        }
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Facial proportion measurements and golden ratio scoring
//!
//! Nine distances are measured between fixed landmark pairs, then six
//! ratios of those distances are compared against phi. Each result carries
//! the ratio (3 decimals) and a closeness percentage (2 decimals), where
//! 100 is a perfect match and the score keeps falling, below zero if need
//! be, as the ratio moves away from phi.

use serde::{Deserialize, Serialize};

use super::landmarks::LandmarkSet;

/// The golden ratio, (1 + sqrt(5)) / 2
pub const PHI: f64 = 1.618_033_988_749_895;

/// Decimal places kept for the ratio value
pub const RATIO_DECIMALS: u32 = 3;

/// Decimal places kept for the closeness percentage
pub const CLOSENESS_DECIMALS: u32 = 2;

/// Named distance between two landmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    FaceHeight,
    NoseLength,
    ChinToLip,
    NoseToLip,
    FaceWidth,
    NoseWidth,
    LipWidth,
    InnerEyeDist,
    OuterEyeDist,
}

impl Measurement {
    pub const ALL: [Measurement; 9] = [
        Measurement::FaceHeight,
        Measurement::NoseLength,
        Measurement::ChinToLip,
        Measurement::NoseToLip,
        Measurement::FaceWidth,
        Measurement::NoseWidth,
        Measurement::LipWidth,
        Measurement::InnerEyeDist,
        Measurement::OuterEyeDist,
    ];

    /// Landmark index pair the distance is measured between
    pub const fn landmark_pair(self) -> (usize, usize) {
        match self {
            // Chin to top of nose bridge
            Measurement::FaceHeight => (8, 27),
            Measurement::NoseLength => (27, 33),
            // Chin to bottom lip
            Measurement::ChinToLip => (8, 57),
            Measurement::NoseToLip => (33, 57),
            // Jawline extremes
            Measurement::FaceWidth => (0, 16),
            Measurement::NoseWidth => (31, 35),
            Measurement::LipWidth => (48, 54),
            Measurement::InnerEyeDist => (39, 42),
            Measurement::OuterEyeDist => (36, 45),
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Measurement::FaceHeight => "face_height",
            Measurement::NoseLength => "nose_length",
            Measurement::ChinToLip => "chin_to_lip",
            Measurement::NoseToLip => "nose_to_lip",
            Measurement::FaceWidth => "face_width",
            Measurement::NoseWidth => "nose_width",
            Measurement::LipWidth => "lip_width",
            Measurement::InnerEyeDist => "inner_eye_dist",
            Measurement::OuterEyeDist => "outer_eye_dist",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// All nine distances for one landmark set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementSet {
    values: [f64; 9],
}

impl MeasurementSet {
    pub fn from_landmarks(landmarks: &LandmarkSet) -> Self {
        let mut values = [0.0; 9];
        for measurement in Measurement::ALL {
            let (a, b) = measurement.landmark_pair();
            values[measurement.slot()] = landmarks.distance(a, b);
        }
        Self { values }
    }

    pub fn get(&self, measurement: Measurement) -> f64 {
        self.values[measurement.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Measurement, f64)> + '_ {
        Measurement::ALL.into_iter().map(|m| (m, self.get(m)))
    }
}

/// One entry in the ratio catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioDefinition {
    pub name: &'static str,
    pub numerator: Measurement,
    pub denominator: Measurement,
}

/// Ratios reported for every face, in output order
pub const RATIO_CATALOG: [RatioDefinition; 6] = [
    RatioDefinition {
        name: "Face Height / Face Width",
        numerator: Measurement::FaceHeight,
        denominator: Measurement::FaceWidth,
    },
    RatioDefinition {
        name: "Nose Length / Chin to Lip",
        numerator: Measurement::NoseLength,
        denominator: Measurement::ChinToLip,
    },
    RatioDefinition {
        name: "Lip Width / Nose Width",
        numerator: Measurement::LipWidth,
        denominator: Measurement::NoseWidth,
    },
    RatioDefinition {
        name: "Outer Eye Dist / Inner Eye Dist",
        numerator: Measurement::OuterEyeDist,
        denominator: Measurement::InnerEyeDist,
    },
    RatioDefinition {
        name: "Face Height / Nose Length",
        numerator: Measurement::FaceHeight,
        denominator: Measurement::NoseLength,
    },
    RatioDefinition {
        name: "Nose to Lip / Chin to Lip",
        numerator: Measurement::NoseToLip,
        denominator: Measurement::ChinToLip,
    },
];

/// Scored ratio as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioResult {
    pub name: String,
    pub ratio: f64,
    pub closeness_to_phi: f64,
}

impl RatioResult {
    /// Score `numerator / denominator` against phi
    ///
    /// A zero denominator yields a zeroed result rather than an error.
    pub fn score(name: &str, numerator: f64, denominator: f64) -> Self {
        let (ratio, closeness) = if denominator == 0.0 {
            (0.0, 0.0)
        } else {
            let ratio = numerator / denominator;
            (ratio, closeness_to_phi(ratio))
        };

        Self {
            name: name.to_string(),
            ratio: round_to(ratio, RATIO_DECIMALS),
            closeness_to_phi: round_to(closeness, CLOSENESS_DECIMALS),
        }
    }
}

/// Percentage closeness of `ratio` to phi, unrounded and unclamped
pub fn closeness_to_phi(ratio: f64) -> f64 {
    100.0 * (1.0 - (ratio - PHI).abs() / PHI)
}

/// Round to `decimals` places, halves away from zero
///
/// Operates on the binary value: 0.0625 rounds to 0.063 at three places
/// because 62.5 is exact, whereas 1.0005 is stored just below the half and
/// rounds down.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Score every catalog ratio for a landmark set
pub fn calculate_ratios(landmarks: &LandmarkSet) -> Vec<RatioResult> {
    let measurements = MeasurementSet::from_landmarks(landmarks);
    score_measurements(&measurements)
}

/// Score every catalog ratio from precomputed measurements, in catalog order
pub fn score_measurements(measurements: &MeasurementSet) -> Vec<RatioResult> {
    RATIO_CATALOG
        .iter()
        .map(|def| {
            RatioResult::score(
                def.name,
                measurements.get(def.numerator),
                measurements.get(def.denominator),
            )
        })
        .collect()
}

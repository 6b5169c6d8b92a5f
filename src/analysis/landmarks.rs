// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! 68-point facial landmark set
//!
//! Index layout follows the standard 68-point annotation scheme:
//!
//! - 0-16: Jawline
//! - 17-26: Eyebrows
//! - 27-35: Nose bridge and tip
//! - 36-47: Eyes
//! - 48-67: Mouth

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Number of points in a landmark set
pub const LANDMARK_COUNT: usize = 68;

pub const JAWLINE: std::ops::Range<usize> = 0..17;
pub const EYEBROWS: std::ops::Range<usize> = 17..27;
pub const NOSE: std::ops::Range<usize> = 27..36;
pub const EYES: std::ops::Range<usize> = 36..48;
pub const MOUTH: std::ops::Range<usize> = 48..68;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LandmarkError {
    #[error("Expected {expected} landmark points, got {actual}")]
    InvalidCount { expected: usize, actual: usize },
}

/// A single landmark position in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Planar Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

// [x, y] on the wire
impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x, self.y].serialize(serializer)
    }
}

/// Exactly 68 ordered landmark points for one face
///
/// The length is enforced at construction, so anything holding a
/// `LandmarkSet` can index 0..68 without further checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkSet {
    points: [Point; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Result<Self, LandmarkError> {
        let actual = points.len();
        let points: [Point; LANDMARK_COUNT] =
            points.try_into().map_err(|_| LandmarkError::InvalidCount {
                expected: LANDMARK_COUNT,
                actual,
            })?;
        Ok(Self { points })
    }

    pub fn from_array(points: [Point; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Distance between two landmark indices
    ///
    /// Panics if either index is 68 or greater.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.points[a].distance(&self.points[b])
    }
}

impl TryFrom<Vec<(i32, i32)>> for LandmarkSet {
    type Error = LandmarkError;

    fn try_from(pairs: Vec<(i32, i32)>) -> Result<Self, Self::Error> {
        Self::new(pairs.into_iter().map(Point::from).collect())
    }
}

impl std::ops::Index<usize> for LandmarkSet {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl Serialize for LandmarkSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points.as_slice().serialize(serializer)
    }
}

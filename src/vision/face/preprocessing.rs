// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the face detector and landmark regressor

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use ndarray::Array4;

use super::detection::FaceBox;

/// Face detector input width (UltraFace RFB-320)
pub const DETECTOR_INPUT_WIDTH: u32 = 320;

/// Face detector input height
pub const DETECTOR_INPUT_HEIGHT: u32 = 240;

/// Pixel mean subtracted before the detector
pub const DETECTOR_MEAN: f32 = 127.0;

/// Pixel scale applied after mean subtraction
pub const DETECTOR_SCALE: f32 = 128.0;

/// Landmark regressor input size (square)
pub const LANDMARK_INPUT_SIZE: u32 = 112;

/// Fraction the face box is grown by before cropping for landmarks
pub const CROP_MARGIN: f32 = 0.1;

/// Resize the full frame to the detector input and normalize
///
/// No letterboxing: detector boxes are normalized to [0, 1] on both axes,
/// so stretching is undone when they are scaled back to the frame.
pub fn preprocess_for_detection(image: &DynamicImage) -> Array4<f32> {
    let resized = image.resize_exact(
        DETECTOR_INPUT_WIDTH,
        DETECTOR_INPUT_HEIGHT,
        FilterType::Triangle,
    );
    let rgb = resized.to_rgb8();

    let (h, w) = (DETECTOR_INPUT_HEIGHT as usize, DETECTOR_INPUT_WIDTH as usize);
    let mut tensor = Array4::zeros((1, 3, h, w));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] =
                (pixel[c] as f32 - DETECTOR_MEAN) / DETECTOR_SCALE;
        }
    }

    tensor
}

/// Pixel rectangle cropped out of the frame for landmark regression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Square region around a face box, grown by [`CROP_MARGIN`] and
    /// clamped to the frame
    ///
    /// Returns `None` if nothing of the box lies inside the frame.
    pub fn around_face(face: &FaceBox, frame_width: u32, frame_height: u32) -> Option<Self> {
        if frame_width == 0 || frame_height == 0 {
            return None;
        }

        let fw = frame_width as f32;
        let fh = frame_height as f32;
        let x1 = face.x1 * fw;
        let y1 = face.y1 * fh;
        let x2 = face.x2 * fw;
        let y2 = face.y2 * fh;

        let side = (x2 - x1).max(y2 - y1) * (1.0 + CROP_MARGIN);
        let cx = (x1 + x2) / 2.0;
        let cy = (y1 + y2) / 2.0;

        let left = (cx - side / 2.0).floor().clamp(0.0, fw);
        let top = (cy - side / 2.0).floor().clamp(0.0, fh);
        let right = (cx + side / 2.0).ceil().clamp(0.0, fw);
        let bottom = (cy + side / 2.0).ceil().clamp(0.0, fh);

        let width = (right - left) as u32;
        let height = (bottom - top) as u32;
        if width == 0 || height == 0 {
            return None;
        }

        Some(Self {
            x: left as u32,
            y: top as u32,
            width,
            height,
        })
    }

    /// Map a crop-normalized coordinate back to frame pixels
    pub fn to_frame(&self, nx: f32, ny: f32) -> (i32, i32) {
        let x = self.x as f32 + nx * self.width as f32;
        let y = self.y as f32 + ny * self.height as f32;
        (x.round() as i32, y.round() as i32)
    }
}

/// Crop, resize to 112x112 and scale to [0, 1], NCHW
pub fn preprocess_for_landmarks(image: &DynamicImage, region: &CropRegion) -> Array4<f32> {
    let (w, h) = image.dimensions();
    let width = region.width.min(w.saturating_sub(region.x)).max(1);
    let height = region.height.min(h.saturating_sub(region.y)).max(1);

    let crop = image.crop_imm(region.x, region.y, width, height);
    let resized = crop.resize_exact(LANDMARK_INPUT_SIZE, LANDMARK_INPUT_SIZE, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let size = LANDMARK_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    tensor
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Landmark overlay rendering

use image::{DynamicImage, Rgb, RgbImage};

use super::landmarks::{LandmarkSet, Point};

/// Marker radius in pixels
pub const MARKER_RADIUS: i32 = 3;

/// Marker fill color
pub const MARKER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Draw a filled marker at every landmark on a copy of `image`
///
/// The result is always RGB8. Markers that fall partly or wholly outside
/// the image are clipped.
pub fn annotate(image: &DynamicImage, landmarks: &LandmarkSet) -> DynamicImage {
    let mut canvas = image.to_rgb8();
    for point in landmarks.iter() {
        draw_filled_circle(&mut canvas, *point, MARKER_RADIUS, MARKER_COLOR);
    }
    DynamicImage::ImageRgb8(canvas)
}

fn draw_filled_circle(canvas: &mut RgbImage, center: Point, radius: i32, color: Rgb<u8>) {
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);
    let r2 = i64::from(radius) * i64::from(radius);

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if i64::from(dx * dx + dy * dy) > r2 {
                continue;
            }
            let x = i64::from(center.x) + i64::from(dx);
            let y = i64::from(center.y) + i64::from(dy);
            if x < 0 || y < 0 || x >= width || y >= height {
                continue;
            }
            canvas.put_pixel(x as u32, y as u32, color);
        }
    }
}

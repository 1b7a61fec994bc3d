// SPDX-License-Identifier: GPL-3.0-only

//! Depth visualization helpers
//!
//! Maps thresholded depth to a linear grayscale ramp: near is dark, far is
//! bright, "no data" is white.

use super::DepthFrame;
use crate::constants::grayscale::{BACKGROUND, DEPTH_SCALE, INTENSITY_SCALE};
use image::{Rgb, RgbImage};

/// Gray level for a depth sample, `round(depth * 256 / 3000)` capped at 255
#[inline]
pub fn gray_level(depth: u16) -> u8 {
    let level = (f64::from(depth) * INTENSITY_SCALE / DEPTH_SCALE).round();
    level.min(255.0) as u8
}

/// Convert a thresholded frame into a 3-channel intensity image
///
/// The frame must already have out-of-window samples zeroed (see
/// [`ThresholdWindow::apply`](super::ThresholdWindow::apply)). Pixels whose
/// level rounds to 0 keep the white background.
pub fn to_grayscale(frame: &DepthFrame) -> RgbImage {
    let mut image = RgbImage::from_pixel(
        frame.width(),
        frame.height(),
        Rgb([BACKGROUND, BACKGROUND, BACKGROUND]),
    );

    let width = frame.width() as usize;
    if width == 0 {
        return image;
    }

    for (index, &depth) in frame.samples().iter().enumerate() {
        let level = gray_level(depth);
        if level != 0 {
            let x = (index % width) as u32;
            let y = (index / width) as u32;
            image.put_pixel(x, y, Rgb([level, level, level]));
        }
    }
    image
}

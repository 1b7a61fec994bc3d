// SPDX-License-Identifier: GPL-3.0-only

//! Downscaling of depth frames for the skeleton tracker

use super::{DepthFrame, Dimensions, ThresholdWindow};
use crate::errors::{AppError, AppResult};

/// Point-sampled, thresholded copy of a depth frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedBuffer {
    dimensions: Dimensions,
    source: Dimensions,
    factor: u32,
    samples: Vec<u16>,
}

impl ReducedBuffer {
    /// Size of the reduced grid
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    /// Size of the frame this buffer was reduced from
    pub fn source_dimensions(&self) -> Dimensions {
        self.source
    }

    /// Stride between sampled source pixels
    pub fn factor(&self) -> u32 {
        self.factor
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Sample at reduced column `x`, row `y`
    pub fn get(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.dimensions.width || y >= self.dimensions.height {
            return None;
        }
        self.samples
            .get(y as usize * self.dimensions.width as usize + x as usize)
            .copied()
    }
}

/// Reduce `frame` by `factor` for tracking
///
/// Each output cell takes the sample at the top-left corner of its
/// `factor x factor` source block; samples outside `window` become 0.
/// Trailing columns and rows that do not fill a whole block are dropped.
pub fn reduce(frame: &DepthFrame, factor: u32, window: &ThresholdWindow) -> AppResult<ReducedBuffer> {
    if factor == 0 {
        return Err(AppError::Config(
            "reduction factor must be a positive integer".into(),
        ));
    }

    let source = frame.dimensions();
    let dimensions = Dimensions::new(source.width / factor, source.height / factor);
    let src_width = source.width as usize;
    let step = factor as usize;
    let src = frame.samples();

    let mut samples = Vec::with_capacity(dimensions.sample_count());
    for row in 0..dimensions.height as usize {
        let row_start = row * step * src_width;
        for col in 0..dimensions.width as usize {
            samples.push(window.filter(src[row_start + col * step]));
        }
    }

    Ok(ReducedBuffer {
        dimensions,
        source,
        factor,
        samples,
    })
}

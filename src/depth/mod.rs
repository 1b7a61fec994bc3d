// SPDX-License-Identifier: GPL-3.0-only

//! Depth frame types and processing
//!
//! Raw frames are grids of 16-bit distance samples in row-major order. This
//! module provides:
//! - [`DepthFrame`]: a full-resolution frame
//! - [`ThresholdWindow`]: the range of depths treated as valid
//! - [`reduce`]: point-sampled downscaling for the tracker
//! - [`to_grayscale`]: intensity image for display

mod reduce;
mod visualization;

pub use reduce::{ReducedBuffer, reduce};
pub use visualization::{gray_level, to_grayscale};

use crate::constants::threshold;

/// Width and height shared by every frame of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of samples in a frame
    pub fn sample_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of a raw frame file in bytes
    pub fn byte_len(&self) -> usize {
        self.sample_count() * crate::constants::frame::BYTES_PER_SAMPLE
    }

    /// Same area with width and height exchanged
    pub fn swapped(&self) -> Self {
        Self::new(self.height, self.width)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One recorded depth image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthFrame {
    dimensions: Dimensions,
    samples: Vec<u16>,
}

impl DepthFrame {
    /// Wrap samples, returning `None` unless there are exactly `width * height`
    pub fn new(dimensions: Dimensions, samples: Vec<u16>) -> Option<Self> {
        (samples.len() == dimensions.sample_count()).then_some(Self {
            dimensions,
            samples,
        })
    }

    /// Decode native-endian sample bytes as read from a frame file
    pub fn from_ne_bytes(dimensions: Dimensions, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != dimensions.byte_len() {
            return None;
        }
        // Copies so the source slice needs no particular alignment
        let samples: Vec<u16> = bytemuck::pod_collect_to_vec(bytes);
        Self::new(dimensions, samples)
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Sample at column `x`, row `y`
    pub fn get(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.dimensions.width || y >= self.dimensions.height {
            return None;
        }
        self.samples
            .get(y as usize * self.dimensions.width as usize + x as usize)
            .copied()
    }

    /// Reinterpret the samples with width and height exchanged
    pub fn swap_dimensions(&mut self) {
        self.dimensions = self.dimensions.swapped();
    }
}

/// Inclusive range of depths considered valid
///
/// The lower bound is fixed for a session; the upper bound moves between
/// `begin + MIN_SPAN` and `MAX_END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdWindow {
    begin: u16,
    end: u16,
}

impl ThresholdWindow {
    /// Create a window, clamping `end` into its allowed range
    pub fn new(begin: u16, end: u16) -> Self {
        let mut window = Self { begin, end };
        window.end = end.clamp(window.min_end(), window.max_end());
        window
    }

    pub fn begin(&self) -> u16 {
        self.begin
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Lowest value `end` may take
    pub fn min_end(&self) -> u16 {
        self.begin.saturating_add(threshold::MIN_SPAN)
    }

    /// Highest value `end` may take
    pub fn max_end(&self) -> u16 {
        threshold::MAX_END.max(self.min_end())
    }

    /// Move the upper bound by `delta`, clamped to its range. Returns the new end.
    pub fn adjust_end(&mut self, delta: i32) -> u16 {
        let target = i32::from(self.end).saturating_add(delta);
        let clamped = target.clamp(i32::from(self.min_end()), i32::from(self.max_end()));
        // Clamped into u16 bounds above
        self.end = clamped as u16;
        self.end
    }

    /// Whether `value` lies inside `[begin, end]`
    #[inline]
    pub fn contains(&self, value: u16) -> bool {
        value >= self.begin && value <= self.end
    }

    /// `value` if it is inside the window, otherwise 0 ("no data")
    #[inline]
    pub fn filter(&self, value: u16) -> u16 {
        if self.contains(value) { value } else { 0 }
    }

    /// Full-resolution copy of `frame` with out-of-window samples zeroed
    pub fn apply(&self, frame: &DepthFrame) -> DepthFrame {
        DepthFrame {
            dimensions: frame.dimensions,
            samples: frame.samples.iter().map(|&v| self.filter(v)).collect(),
        }
    }
}

impl Default for ThresholdWindow {
    fn default() -> Self {
        Self::new(threshold::DEFAULT_BEGIN, threshold::MAX_END)
    }
}

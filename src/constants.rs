// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants
//!
//! Depth ranges, overlay geometry and colors used across the replay pipeline.

/// Depth threshold window limits (millimeters)
pub mod threshold {
    /// Default lower bound of the valid depth window
    pub const DEFAULT_BEGIN: u16 = 500;
    /// Upper bound can never exceed this value
    pub const MAX_END: u16 = 8000;
    /// Smallest allowed distance between begin and end
    pub const MIN_SPAN: u16 = 300;
    /// Step applied by the `+`/`-` keys
    pub const DEFAULT_STEP: i32 = 100;
}

/// Frame geometry
pub mod frame {
    /// Default sensor resolution (Kinect v1 depth stream)
    pub const DEFAULT_WIDTH: u32 = 640;
    pub const DEFAULT_HEIGHT: u32 = 480;
    /// Bytes per raw depth sample
    pub const BYTES_PER_SAMPLE: usize = std::mem::size_of::<u16>();
}

/// Grayscale mapping
pub mod grayscale {
    /// Depth value that maps to intensity 256
    pub const DEPTH_SCALE: f64 = 3000.0;
    /// Intensity range numerator
    pub const INTENSITY_SCALE: f64 = 256.0;
    /// Background for samples outside the threshold window
    pub const BACKGROUND: u8 = 255;
}

/// Smoothing controls forwarded to the tracker
pub mod smoothing {
    /// Factor reported by a freshly constructed tracker
    pub const DEFAULT_FACTOR: f32 = 0.5;
    /// Step applied by the Left/Right keys
    pub const DEFAULT_STEP: f32 = 0.05;
}

/// Overlay geometry and colors
pub mod overlay {
    /// Half-extent of the square joint markers (pixels)
    pub const DEFAULT_POINT_SIZE: u32 = 6;
    /// Stroke width of skeleton connections
    pub const LINE_WIDTH: u32 = 10;
    /// Circle radius numerators, divided by the joint depth
    pub const HEAD_RADIUS: f32 = 50_000.0;
    pub const HAND_RADIUS: f32 = 30_000.0;

    pub const CONNECTION_COLOR: [u8; 3] = [0xaf, 0xaf, 0xaf];
    pub const HEAD_CIRCLE_COLOR: [u8; 3] = [0xff, 0xf8, 0x00];
    pub const LEFT_HAND_CIRCLE_COLOR: [u8; 3] = [0xc2, 0xff, 0x00];
    pub const RIGHT_HAND_CIRCLE_COLOR: [u8; 3] = [0x00, 0xfa, 0xff];
    /// Skeleton view canvas
    pub const CANVAS_COLOR: [u8; 3] = [0xff, 0xff, 0xff];
}

/// Snapshot output
pub mod snapshot {
    /// Subdirectory created under the user's picture directory
    pub const DIR_NAME: &str = "depth-replay";
    pub const EXTENSION: &str = "png";
}

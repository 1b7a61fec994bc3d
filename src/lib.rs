// SPDX-License-Identifier: GPL-3.0-only

//! Depth Replay - replay recorded depth frames and inspect tracked skeletons
//!
//! The library holds the processing and playback pipeline; the binary adds
//! the command line and a terminal viewer on top.
//!
//! # Architecture
//!
//! - [`backends`]: frame sources and loading of raw frame files
//! - [`depth`]: depth frames, threshold window, reduction and grayscale mapping
//! - [`skeleton`]: joints, the tracker port and the joint overlay
//! - [`playback`]: the session and its cursor
//! - [`terminal`]: interactive terminal viewer
//! - [`config`]: user configuration
//! - [`storage`]: snapshot files

pub mod backends;
pub mod config;
pub mod constants;
pub mod depth;
pub mod errors;
pub mod playback;
pub mod skeleton;
pub mod storage;
pub mod terminal;

/// Name used for configuration and snapshot directories
pub const APP_NAME: &str = "depth-replay";

// Re-export commonly used types
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use playback::{PlaybackController, PlaybackState};

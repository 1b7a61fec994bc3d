// SPDX-License-Identifier: GPL-3.0-only

//! Frame source backends

pub mod frame_source;

pub use frame_source::{DirectorySource, FrameSource, LoadedFrame, load_frames};

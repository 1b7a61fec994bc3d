// SPDX-License-Identifier: GPL-3.0-only

//! Status line shown under the frame

use super::PlaybackState;
use std::fmt;
use std::path::PathBuf;

/// Values the viewer reports about the session
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub threshold_end: u16,
    /// One-based, 0 when nothing is loaded
    pub frame_number: usize,
    pub frame_count: usize,
    pub path: Option<PathBuf>,
    pub smoothing_enabled: bool,
    pub smoothing_factor: f32,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tracked = match self.state {
            PlaybackState::Empty => "empty",
            PlaybackState::Loaded => "not tracked",
            PlaybackState::Tracked => "tracked",
        };

        write!(
            f,
            "Threshold: {} | Frame: {}/{} - {} ({}) | Smoothing: {} | Level: {:.2}",
            self.threshold_end,
            self.frame_number,
            self.frame_count,
            name,
            tracked,
            if self.smoothing_enabled { "Yes" } else { "No" },
            self.smoothing_factor
        )
    }
}

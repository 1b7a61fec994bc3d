// SPDX-License-Identifier: GPL-3.0-only

//! Playback controller
//!
//! Owns the loaded session: one [`FrameRecord`] per recorded frame (path,
//! depth data and, after tracking, the detected joints) and a single cursor
//! into that list. All operations run synchronously on the caller's thread.

mod status;

pub use status::PlaybackStatus;

use crate::backends::{FrameSource, load_frames};
use crate::config::Config;
use crate::depth::{self, DepthFrame, Dimensions, ThresholdWindow};
use crate::errors::{AppError, AppResult, TrackerError};
use crate::skeleton::overlay::{self, OverlayStyle};
use crate::skeleton::tracker::{SkeletonTracker, SmoothingState};
use crate::skeleton::JointSet;
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No frames loaded
    Empty,
    /// Frames loaded, not tracked yet
    Loaded,
    /// Every frame has a skeleton entry
    Tracked,
}

/// Everything known about one recorded frame
#[derive(Debug, Clone)]
pub struct FrameRecord {
    pub path: PathBuf,
    pub frame: DepthFrame,
    /// `None` until the session has been tracked
    pub skeleton: Option<JointSet>,
}

/// A frame the tracker could not process
#[derive(Debug, Clone, PartialEq)]
pub struct TrackFailure {
    pub index: usize,
    pub path: PathBuf,
    pub error: TrackerError,
}

/// Outcome of a tracking pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackReport {
    /// Frames processed
    pub frames: usize,
    /// Frames where at least one joint was found
    pub with_joints: usize,
    /// Frames recorded as "no joints" because the tracker failed
    pub failures: Vec<TrackFailure>,
}

pub struct PlaybackController {
    dimensions: Dimensions,
    reduction_factor: u32,
    window: ThresholdWindow,
    smoothing: SmoothingState,
    tracker: Option<Box<dyn SkeletonTracker>>,
    records: Vec<FrameRecord>,
    cursor: usize,
    tracked: bool,
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("dimensions", &self.dimensions)
            .field("reduction_factor", &self.reduction_factor)
            .field("window", &self.window)
            .field("smoothing", &self.smoothing)
            .field("has_tracker", &self.has_tracker())
            .field("frames", &self.records.len())
            .field("cursor", &self.cursor)
            .field("state", &self.state())
            .finish()
    }
}

impl PlaybackController {
    /// Create an empty session from validated configuration
    pub fn new(config: &Config, reduction_factor: u32) -> AppResult<Self> {
        config.validate()?;
        if reduction_factor == 0 {
            return Err(AppError::Config(
                "reduction factor must be a positive integer".into(),
            ));
        }

        Ok(Self {
            dimensions: Dimensions::new(config.width, config.height),
            reduction_factor,
            window: ThresholdWindow::new(config.threshold_begin, config.threshold_end),
            smoothing: SmoothingState {
                enabled: false,
                factor: 0.0,
            },
            tracker: None,
            records: Vec::new(),
            cursor: 0,
            tracked: false,
        })
    }

    /// Builder form of [`attach_tracker`](Self::attach_tracker)
    pub fn with_tracker(mut self, tracker: Box<dyn SkeletonTracker>) -> Self {
        self.attach_tracker(tracker);
        self
    }

    /// Install the tracker; the smoothing factor starts from the tracker's own
    pub fn attach_tracker(&mut self, mut tracker: Box<dyn SkeletonTracker>) {
        self.smoothing.factor = tracker.smoothing_factor();
        tracker.set_smoothing_enabled(self.smoothing.enabled);
        self.tracker = Some(tracker);
    }

    pub fn has_tracker(&self) -> bool {
        self.tracker.is_some()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Replace the session with all frames from `source`
    ///
    /// On error the session is left empty. Returns the number of frames.
    pub fn load(&mut self, source: &dyn FrameSource) -> AppResult<usize> {
        self.records.clear();
        self.cursor = 0;
        self.tracked = false;

        let frames = load_frames(source, self.dimensions)?;
        self.records = frames
            .into_iter()
            .map(|loaded| FrameRecord {
                path: loaded.path,
                frame: loaded.frame,
                skeleton: None,
            })
            .collect();
        Ok(self.records.len())
    }

    pub fn state(&self) -> PlaybackState {
        if self.records.is_empty() {
            PlaybackState::Empty
        } else if self.tracked {
            PlaybackState::Tracked
        } else {
            PlaybackState::Loaded
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FrameRecord] {
        &self.records
    }

    /// Frame paths in playback order
    pub fn frame_paths(&self) -> impl Iterator<Item = &Path> {
        self.records.iter().map(|r| r.path.as_path())
    }

    // =========================================================================
    // Tracking
    // =========================================================================

    /// Run the tracker over every frame, replacing any earlier results
    ///
    /// A tracker failure on one frame is logged, recorded in the report and
    /// stored as an empty joint set; the pass carries on with the next frame.
    pub fn track(&mut self) -> AppResult<TrackReport> {
        if self.records.is_empty() {
            debug!("Nothing to track");
            return Ok(TrackReport::default());
        }

        let Some(tracker) = self.tracker.as_mut() else {
            return Err(AppError::Config("no skeleton tracker attached".into()));
        };

        for record in &mut self.records {
            record.skeleton = None;
        }
        self.tracked = false;
        tracker.reset();

        let mut report = TrackReport {
            frames: self.records.len(),
            ..TrackReport::default()
        };

        for (index, record) in self.records.iter_mut().enumerate() {
            // Reduced buffer lives only for this iteration
            let buffer = depth::reduce(&record.frame, self.reduction_factor, &self.window)?;

            let joints = match tracker.track_joints(&buffer) {
                Ok(joints) => joints,
                Err(error) => {
                    warn!(
                        frame = index + 1,
                        path = %record.path.display(),
                        %error,
                        "Tracking failed, recording no joints"
                    );
                    report.failures.push(TrackFailure {
                        index,
                        path: record.path.clone(),
                        error,
                    });
                    JointSet::new()
                }
            };

            debug!(frame = index + 1, joints = joints.len(), "Tracked frame");
            if !joints.is_empty() {
                report.with_joints += 1;
            }
            record.skeleton = Some(joints);
        }

        self.tracked = true;
        info!(
            frames = report.frames,
            with_joints = report.with_joints,
            failures = report.failures.len(),
            "Tracking pass complete"
        );
        Ok(report)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Zero-based cursor
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// One-based frame number for display, 0 when empty
    pub fn frame_number(&self) -> usize {
        if self.records.is_empty() {
            0
        } else {
            self.cursor + 1
        }
    }

    pub fn first(&mut self) {
        if !self.records.is_empty() {
            self.cursor = 0;
        }
    }

    pub fn last(&mut self) {
        if let Some(last) = self.records.len().checked_sub(1) {
            self.cursor = last;
        }
    }

    /// Step forward; `false` at the last frame
    pub fn next(&mut self) -> bool {
        if self.cursor + 1 < self.records.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Step back; `false` at the first frame
    pub fn previous(&mut self) -> bool {
        if self.cursor > 0 && !self.records.is_empty() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn current_record(&self) -> Option<&FrameRecord> {
        self.records.get(self.cursor)
    }

    pub fn current_frame(&self) -> Option<&DepthFrame> {
        self.current_record().map(|r| &r.frame)
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_record().map(|r| r.path.as_path())
    }

    /// Joints at the cursor; `None` until the session has been tracked
    pub fn current_skeleton(&self) -> Option<&JointSet> {
        self.current_record().and_then(|r| r.skeleton.as_ref())
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn threshold_window(&self) -> ThresholdWindow {
        self.window
    }

    pub fn reduction_factor(&self) -> u32 {
        self.reduction_factor
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Move the threshold end by `delta`; affects the next [`track`](Self::track) only
    pub fn set_threshold_end(&mut self, delta: i32) -> u16 {
        let end = self.window.adjust_end(delta);
        debug!(threshold_end = end, "Threshold changed");
        end
    }

    pub fn smoothing(&self) -> SmoothingState {
        self.smoothing
    }

    /// Flip smoothing on/off and forward it to the tracker if present
    pub fn toggle_smoothing(&mut self) -> bool {
        self.smoothing.enabled = !self.smoothing.enabled;
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.set_smoothing_enabled(self.smoothing.enabled);
        }
        self.smoothing.enabled
    }

    /// Nudge the smoothing factor; does nothing without a tracker
    pub fn adjust_smoothing_factor(&mut self, delta: f32) -> Option<f32> {
        let tracker = self.tracker.as_mut()?;
        let factor = self.smoothing.nudge(delta);
        tracker.set_smoothing_factor(factor);
        debug!(factor, "Smoothing factor changed");
        Some(factor)
    }

    /// Exchange width and height for the session and every loaded frame
    ///
    /// Stored skeletons are kept as they are.
    pub fn toggle_orientation(&mut self) -> Dimensions {
        self.dimensions = self.dimensions.swapped();
        for record in &mut self.records {
            record.frame.swap_dimensions();
        }
        info!(dimensions = %self.dimensions, "Orientation changed");
        self.dimensions
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Grayscale image of the current frame with its joints drawn on top
    ///
    /// Uses the current threshold window at full resolution.
    pub fn render_current(&self, style: &OverlayStyle) -> Option<RgbImage> {
        let record = self.current_record()?;
        let thresholded = self.window.apply(&record.frame);
        let mut image = depth::to_grayscale(&thresholded);
        if let Some(joints) = record.skeleton.as_ref() {
            overlay::overlay(&mut image, joints, style);
        }
        Some(image)
    }

    /// Skeleton-only view of the current frame
    pub fn render_skeleton_view(&self) -> Option<RgbImage> {
        let record = self.current_record()?;
        let empty = JointSet::new();
        let joints = record.skeleton.as_ref().unwrap_or(&empty);
        Some(overlay::skeleton_view(
            record.frame.width(),
            record.frame.height(),
            joints,
        ))
    }

    /// Snapshot of the values shown in the status line
    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            state: self.state(),
            threshold_end: self.window.end(),
            frame_number: self.frame_number(),
            frame_count: self.records.len(),
            path: self.current_path().map(Path::to_path_buf),
            smoothing_enabled: self.smoothing.enabled,
            smoothing_factor: self.smoothing.factor,
        }
    }
}

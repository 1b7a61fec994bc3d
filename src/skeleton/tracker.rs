// SPDX-License-Identifier: GPL-3.0-only

//! Skeleton tracker port
//!
//! The playback controller talks to trackers only through [`SkeletonTracker`].
//! [`CentroidTracker`] is a lightweight built-in implementation that locates
//! the body centre and head in a reduced depth buffer.

use super::{Joint, JointId, JointSet};
use crate::constants::smoothing::DEFAULT_FACTOR;
use crate::depth::ReducedBuffer;
use crate::errors::TrackerError;
use tracing::debug;

/// A tracker that turns a reduced depth buffer into joints
pub trait SkeletonTracker {
    /// Detect joints in one reduced frame
    fn track_joints(&mut self, buffer: &ReducedBuffer) -> Result<JointSet, TrackerError>;

    /// Turn temporal smoothing on or off
    fn set_smoothing_enabled(&mut self, enabled: bool);

    /// Set the smoothing strength in `[0, 1]`
    fn set_smoothing_factor(&mut self, factor: f32);

    /// Current smoothing strength
    fn smoothing_factor(&self) -> f32;

    /// Forget state carried between frames (called before each tracking pass)
    fn reset(&mut self) {}
}

/// Smoothing configuration mirrored by the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingState {
    pub enabled: bool,
    pub factor: f32,
}

impl SmoothingState {
    /// Move the factor by `delta`, clamped to `[0, 1]`. Returns the new factor.
    pub fn nudge(&mut self, delta: f32) -> f32 {
        self.factor = (self.factor + delta).clamp(0.0, 1.0);
        self.factor
    }
}

impl Default for SmoothingState {
    fn default() -> Self {
        Self {
            enabled: false,
            factor: DEFAULT_FACTOR,
        }
    }
}

/// Centroid-based tracker
///
/// `CENTER` is the mean position of all valid cells and `HEAD` the middle of
/// the top-most row that has valid cells. Coordinates are mapped back to the
/// full-resolution frame and `z` is the mean depth of the contributing cells.
#[derive(Debug, Default)]
pub struct CentroidTracker {
    smoothing: SmoothingState,
    previous: Option<JointSet>,
}

impl CentroidTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn smooth(&self, current: JointSet) -> JointSet {
        let Some(previous) = self.previous.as_ref() else {
            return current;
        };
        if !self.smoothing.enabled {
            return current;
        }

        let f = self.smoothing.factor;
        let mut smoothed = JointSet::new();
        for (id, joint) in current.iter() {
            let blended = match previous.get(id) {
                Some(prev) => Joint::new(
                    blend(prev.screen_x as f32, joint.screen_x as f32, f).round() as i32,
                    blend(prev.screen_y as f32, joint.screen_y as f32, f).round() as i32,
                    blend(prev.z, joint.z, f),
                ),
                None => *joint,
            };
            smoothed.insert(id, blended);
        }
        smoothed
    }
}

#[inline]
fn blend(previous: f32, current: f32, factor: f32) -> f32 {
    factor * previous + (1.0 - factor) * current
}

#[derive(Default)]
struct Accumulator {
    sum_x: f64,
    sum_y: f64,
    sum_z: f64,
    count: u64,
}

impl Accumulator {
    fn add(&mut self, x: u32, y: u32, z: u16) {
        self.sum_x += f64::from(x);
        self.sum_y += f64::from(y);
        self.sum_z += f64::from(z);
        self.count += 1;
    }

    /// Mean position scaled back to source pixels
    fn joint(&self, factor: u32) -> Option<Joint> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let scale = f64::from(factor);
        Some(Joint::new(
            (self.sum_x / n * scale).round() as i32,
            (self.sum_y / n * scale).round() as i32,
            (self.sum_z / n) as f32,
        ))
    }
}

impl SkeletonTracker for CentroidTracker {
    fn track_joints(&mut self, buffer: &ReducedBuffer) -> Result<JointSet, TrackerError> {
        if buffer.width() == 0 || buffer.height() == 0 {
            return Err(TrackerError::InvalidInput(format!(
                "empty {} depth buffer",
                buffer.dimensions()
            )));
        }

        let mut body = Accumulator::default();
        let mut head = Accumulator::default();
        let mut head_row = None;

        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let Some(depth) = buffer.get(x, y).filter(|&d| d != 0) else {
                    continue;
                };
                body.add(x, y, depth);
                if head_row.is_none_or(|row| row == y) {
                    head_row = Some(y);
                    head.add(x, y, depth);
                }
            }
        }

        let mut joints = JointSet::new();
        if let Some(center) = body.joint(buffer.factor()) {
            joints.insert(JointId::Center, center);
        }
        if let Some(top) = head.joint(buffer.factor()) {
            joints.insert(JointId::Head, top);
        }

        let joints = self.smooth(joints);
        debug!(
            joints = ?joints.iter().map(|(id, _)| id.display_name()).collect::<Vec<_>>(),
            cells = body.count,
            "Tracked frame"
        );

        self.previous = (!joints.is_empty()).then(|| joints.clone());
        Ok(joints)
    }

    fn set_smoothing_enabled(&mut self, enabled: bool) {
        self.smoothing.enabled = enabled;
    }

    fn set_smoothing_factor(&mut self, factor: f32) {
        self.smoothing.factor = factor.clamp(0.0, 1.0);
    }

    fn smoothing_factor(&self) -> f32 {
        self.smoothing.factor
    }

    fn reset(&mut self) {
        self.previous = None;
    }
}

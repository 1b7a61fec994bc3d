// SPDX-License-Identifier: GPL-3.0-only

//! Skeleton joints produced by a tracker
//!
//! - [`JointSet`]: the joints detected in one frame
//! - [`overlay`]: draw planning and rasterization on top of depth images
//! - [`tracker`]: the tracker port and a built-in implementation

pub mod overlay;
pub mod tracker;

/// Identifiers of the joints a tracker can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointId {
    Head = 0,
    LeftShoulder = 1,
    RightShoulder = 2,
    LeftElbow = 3,
    RightElbow = 4,
    LeftHand = 5,
    RightHand = 6,
    ShoulderCenter = 7,
    Center = 8,
}

impl JointId {
    pub const COUNT: usize = 9;

    /// Every joint, in index order
    pub const ALL: [JointId; JointId::COUNT] = [
        JointId::Head,
        JointId::LeftShoulder,
        JointId::RightShoulder,
        JointId::LeftElbow,
        JointId::RightElbow,
        JointId::LeftHand,
        JointId::RightHand,
        JointId::ShoulderCenter,
        JointId::Center,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn display_name(self) -> &'static str {
        match self {
            JointId::Head => "head",
            JointId::LeftShoulder => "left shoulder",
            JointId::RightShoulder => "right shoulder",
            JointId::LeftElbow => "left elbow",
            JointId::RightElbow => "right elbow",
            JointId::LeftHand => "left hand",
            JointId::RightHand => "right hand",
            JointId::ShoulderCenter => "shoulder center",
            JointId::Center => "center",
        }
    }

    /// Color of the square marker drawn on the depth image
    pub fn marker_color(self) -> [u8; 3] {
        match self {
            JointId::Head => [0xff, 0x00, 0x00],
            JointId::LeftHand => [0x00, 0xff, 0x00],
            JointId::RightHand => [0x00, 0x00, 0xff],
            JointId::LeftElbow => [0x97, 0xff, 0x93],
            JointId::RightElbow => [0x90, 0x94, 0xff],
            JointId::LeftShoulder => [0x12, 0x55, 0x00],
            JointId::RightShoulder => [0x00, 0x00, 0x45],
            JointId::ShoulderCenter => [0x00, 0x00, 0x00],
            JointId::Center => [0xff, 0xfb, 0x00],
        }
    }
}

/// A detected joint
///
/// `screen_x`/`screen_y` are pixel coordinates in the full-resolution frame;
/// `z` is the joint depth, used to shrink markers of distant joints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub screen_x: i32,
    pub screen_y: i32,
    pub z: f32,
}

impl Joint {
    pub fn new(screen_x: i32, screen_y: i32, z: f32) -> Self {
        Self {
            screen_x,
            screen_y,
            z,
        }
    }
}

/// Joints found in one frame; a missing joint was simply not detected
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JointSet {
    joints: [Option<Joint>; JointId::COUNT],
}

impl JointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: JointId, joint: Joint) -> Self {
        self.insert(id, joint);
        self
    }

    pub fn insert(&mut self, id: JointId, joint: Joint) {
        self.joints[id.index()] = Some(joint);
    }

    pub fn get(&self, id: JointId) -> Option<&Joint> {
        self.joints[id.index()].as_ref()
    }

    pub fn contains(&self, id: JointId) -> bool {
        self.joints[id.index()].is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.iter().all(Option::is_none)
    }

    /// Number of joints present
    pub fn len(&self) -> usize {
        self.joints.iter().filter(|j| j.is_some()).count()
    }

    /// Present joints in [`JointId::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (JointId, &Joint)> {
        JointId::ALL
            .iter()
            .filter_map(|&id| self.get(id).map(|joint| (id, joint)))
    }
}

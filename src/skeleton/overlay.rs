// SPDX-License-Identifier: GPL-3.0-only

//! Joint overlay
//!
//! Drawing is split in two steps: a joint set is turned into a list of
//! [`DrawCommand`]s, which [`rasterize`] then paints onto an RGB image.
//! Anything that falls outside the image is clipped.

use super::{JointId, JointSet};
use crate::constants::overlay::{
    CANVAS_COLOR, CONNECTION_COLOR, HAND_RADIUS, HEAD_CIRCLE_COLOR, HEAD_RADIUS,
    LEFT_HAND_CIRCLE_COLOR, LINE_WIDTH, RIGHT_HAND_CIRCLE_COLOR,
};
use image::{Rgb, RgbImage};

/// Anatomical connections, drawn only when both ends are present
pub const CONNECTIONS: [(JointId, JointId); 8] = [
    (JointId::Head, JointId::ShoulderCenter),
    (JointId::ShoulderCenter, JointId::Center),
    (JointId::LeftShoulder, JointId::ShoulderCenter),
    (JointId::LeftShoulder, JointId::LeftElbow),
    (JointId::RightShoulder, JointId::ShoulderCenter),
    (JointId::RightShoulder, JointId::RightElbow),
    (JointId::RightHand, JointId::RightElbow),
    (JointId::LeftHand, JointId::LeftElbow),
];

/// Joints drawn as depth-scaled circles in the skeleton view
const CIRCLES: [(JointId, f32, [u8; 3]); 3] = [
    (JointId::Head, HEAD_RADIUS, HEAD_CIRCLE_COLOR),
    (JointId::LeftHand, HAND_RADIUS, LEFT_HAND_CIRCLE_COLOR),
    (JointId::RightHand, HAND_RADIUS, RIGHT_HAND_CIRCLE_COLOR),
];

/// A single primitive to paint
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled square covering `[x - half_extent, x + half_extent)` on both axes
    Marker {
        joint: JointId,
        x: i32,
        y: i32,
        half_extent: u32,
        color: [u8; 3],
    },
    /// Segment between two joints
    Line {
        from: (JointId, i32, i32),
        to: (JointId, i32, i32),
        width: u32,
        color: [u8; 3],
    },
    /// Filled circle whose radius already accounts for joint depth
    Circle {
        joint: JointId,
        x: i32,
        y: i32,
        radius: f32,
        color: [u8; 3],
    },
}

/// How joints are drawn on top of the depth image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayStyle {
    /// Half-extent of square markers
    pub point_size: u32,
    /// Also draw the connections between joints
    pub connections: bool,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            point_size: crate::constants::overlay::DEFAULT_POINT_SIZE,
            connections: true,
        }
    }
}

/// Circle radius for a joint at depth `z`; nearer joints are larger
pub fn circle_radius(base: f32, z: f32) -> Option<f32> {
    (z > 0.0).then(|| base / z)
}

/// One square marker per present joint
pub fn marker_commands(joints: &JointSet, half_extent: u32) -> Vec<DrawCommand> {
    joints
        .iter()
        .map(|(id, joint)| DrawCommand::Marker {
            joint: id,
            x: joint.screen_x,
            y: joint.screen_y,
            half_extent,
            color: id.marker_color(),
        })
        .collect()
}

fn connection_command(joints: &JointSet, a: JointId, b: JointId) -> Option<DrawCommand> {
    let ja = joints.get(a)?;
    let jb = joints.get(b)?;
    Some(DrawCommand::Line {
        from: (a, ja.screen_x, ja.screen_y),
        to: (b, jb.screen_x, jb.screen_y),
        width: LINE_WIDTH,
        color: CONNECTION_COLOR,
    })
}

fn circle_command(
    joints: &JointSet,
    (id, base, color): (JointId, f32, [u8; 3]),
) -> Option<DrawCommand> {
    let joint = joints.get(id)?;
    let radius = circle_radius(base, joint.z)?;
    Some(DrawCommand::Circle {
        joint: id,
        x: joint.screen_x,
        y: joint.screen_y,
        radius,
        color,
    })
}

/// Segments for every connection whose two joints are present
pub fn connection_commands(joints: &JointSet) -> Vec<DrawCommand> {
    CONNECTIONS
        .iter()
        .filter_map(|&(a, b)| connection_command(joints, a, b))
        .collect()
}

/// Depth-scaled circles for the head and hands
pub fn circle_commands(joints: &JointSet) -> Vec<DrawCommand> {
    CIRCLES
        .iter()
        .filter_map(|&circle| circle_command(joints, circle))
        .collect()
}

/// Commands for the depth image overlay; connections go under the markers
pub fn plan_overlay(joints: &JointSet, style: &OverlayStyle) -> Vec<DrawCommand> {
    let mut commands = if style.connections {
        connection_commands(joints)
    } else {
        Vec::new()
    };
    commands.extend(marker_commands(joints, style.point_size));
    commands
}

/// Commands for the standalone skeleton view
///
/// The head circle is painted right after the neck segment, so the
/// remaining connections go over it; the hand circles come last.
pub fn plan_skeleton_view(joints: &JointSet) -> Vec<DrawCommand> {
    let [neck, body @ ..] = CONNECTIONS;
    let [head, hands @ ..] = CIRCLES;

    let mut commands = Vec::new();
    commands.extend(connection_command(joints, neck.0, neck.1));
    commands.extend(circle_command(joints, head));
    commands.extend(
        body.iter()
            .filter_map(|&(a, b)| connection_command(joints, a, b)),
    );
    commands.extend(
        hands
            .iter()
            .filter_map(|&circle| circle_command(joints, circle)),
    );
    commands
}

/// Draw `joints` on top of `image`
pub fn overlay(image: &mut RgbImage, joints: &JointSet, style: &OverlayStyle) {
    rasterize(image, &plan_overlay(joints, style));
}

/// White canvas with connections and head/hand circles
pub fn skeleton_view(width: u32, height: u32, joints: &JointSet) -> RgbImage {
    let mut image = RgbImage::from_pixel(width, height, Rgb(CANVAS_COLOR));
    rasterize(&mut image, &plan_skeleton_view(joints));
    image
}

/// Paint commands in order
///
/// Coordinates may lie anywhere in the `i32` range; only the part inside
/// the image is painted.
pub fn rasterize(image: &mut RgbImage, commands: &[DrawCommand]) {
    for command in commands {
        match *command {
            DrawCommand::Marker {
                x,
                y,
                half_extent,
                color,
                ..
            } => fill_square(
                image,
                i64::from(x),
                i64::from(y),
                i64::from(half_extent),
                Rgb(color),
            ),
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => draw_line(image, (from.1, from.2), (to.1, to.2), width, Rgb(color)),
            DrawCommand::Circle {
                x,
                y,
                radius,
                color,
                ..
            } => fill_circle(image, x, y, radius, Rgb(color)),
        }
    }
}

fn fill_square(image: &mut RgbImage, cx: i64, cy: i64, half: i64, color: Rgb<u8>) {
    let x0 = (cx - half).max(0);
    let y0 = (cy - half).max(0);
    let x1 = (cx + half).min(i64::from(image.width()));
    let y1 = (cy + half).min(i64::from(image.height()));
    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x as u32, y as u32, color);
        }
    }
}

type Point = (f64, f64);

/// Liang-Barsky clip of the segment `a`-`b` to the box `[min, max]`
fn clip_segment(a: Point, b: Point, min: Point, max: Point) -> Option<(Point, Point)> {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, a.0 - min.0),
        (dx, max.0 - a.0),
        (-dy, a.1 - min.1),
        (dy, max.1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

fn draw_line(image: &mut RgbImage, from: (i32, i32), to: (i32, i32), width: u32, color: Rgb<u8>) {
    let half = i64::from((width / 2).max(1));
    // Squares centred up to `half` outside the image still reach into it
    let reach = half as f64;
    let Some((a, b)) = clip_segment(
        (f64::from(from.0), f64::from(from.1)),
        (f64::from(to.0), f64::from(to.1)),
        (-reach, -reach),
        (
            f64::from(image.width()) + reach,
            f64::from(image.height()) + reach,
        ),
    ) else {
        return;
    };

    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i64;

    for step in 0..=steps {
        let t = step as f64 / steps as f64;
        let x = (a.0 + dx * t).round() as i64;
        let y = (a.1 + dy * t).round() as i64;
        fill_square(image, x, y, half, color);
    }
}

fn fill_circle(image: &mut RgbImage, cx: i32, cy: i32, radius: f32, color: Rgb<u8>) {
    if !radius.is_finite() || radius <= 0.0 {
        return;
    }
    let r = radius.ceil() as i64;
    let x0 = i64::from(cx).saturating_sub(r).max(0);
    let y0 = i64::from(cy).saturating_sub(r).max(0);
    let x1 = i64::from(cx)
        .saturating_add(r)
        .min(i64::from(image.width()) - 1);
    let y1 = i64::from(cy)
        .saturating_add(r)
        .min(i64::from(image.height()) - 1);
    let r2 = f64::from(radius) * f64::from(radius);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let ddx = (x - i64::from(cx)) as f64;
            let ddy = (y - i64::from(cy)) as f64;
            if ddx * ddx + ddy * ddy <= r2 {
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::Joint;

    fn count_lines(commands: &[DrawCommand]) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    fn count_markers(commands: &[DrawCommand]) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Marker { .. }))
            .count()
    }

    #[test]
    fn test_head_only_draws_no_connections() {
        let joints = JointSet::new().with(JointId::Head, Joint::new(50, 40, 1200.0));
        let commands = plan_overlay(&joints, &OverlayStyle::default());
        assert_eq!(count_lines(&commands), 0);
        assert_eq!(count_markers(&commands), 1);
    }

    #[test]
    fn test_head_and_shoulder_center_draw_one_connection() {
        let joints = JointSet::new()
            .with(JointId::Head, Joint::new(50, 40, 1200.0))
            .with(JointId::ShoulderCenter, Joint::new(50, 80, 1250.0));
        let commands = plan_overlay(&joints, &OverlayStyle::default());
        assert_eq!(count_lines(&commands), 1);
        assert_eq!(count_markers(&commands), 2);
        assert!(matches!(
            commands[0],
            DrawCommand::Line {
                from: (JointId::Head, 50, 40),
                to: (JointId::ShoulderCenter, 50, 80),
                ..
            }
        ));
    }

    #[test]
    fn test_connections_can_be_disabled() {
        let joints = JointSet::new()
            .with(JointId::Head, Joint::new(50, 40, 1200.0))
            .with(JointId::ShoulderCenter, Joint::new(50, 80, 1250.0));
        let style = OverlayStyle {
            connections: false,
            ..OverlayStyle::default()
        };
        assert_eq!(count_lines(&plan_overlay(&joints, &style)), 0);
    }

    #[test]
    fn test_marker_is_clipped_at_corner() {
        let mut image = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let joints = JointSet::new().with(JointId::Head, Joint::new(0, 0, 1000.0));
        overlay(
            &mut image,
            &joints,
            &OverlayStyle {
                point_size: 3,
                connections: true,
            },
        );
        // Square spans [-3, 3) so only the 3x3 corner is inside
        let red = image.pixels().filter(|p| **p == Rgb([0xff, 0, 0])).count();
        assert_eq!(red, 9);
        assert_eq!(image.get_pixel(2, 2), &Rgb([0xff, 0, 0]));
        assert_eq!(image.get_pixel(3, 3), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_marker_fully_outside_draws_nothing() {
        let mut image = RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]));
        let joints = JointSet::new().with(JointId::Center, Joint::new(-40, 200, 1000.0));
        overlay(&mut image, &joints, &OverlayStyle::default());
        assert!(image.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_circle_radius_shrinks_with_depth() {
        let near = circle_radius(HEAD_RADIUS, 1000.0).unwrap();
        let far = circle_radius(HEAD_RADIUS, 2000.0).unwrap();
        assert!(near > far);
        assert_eq!(near, 50.0);
        assert_eq!(circle_radius(HEAD_RADIUS, 0.0), None);
    }

    #[test]
    fn test_skeleton_view_draws_head_circle() {
        let joints = JointSet::new().with(JointId::Head, Joint::new(20, 20, 5000.0));
        let commands = plan_skeleton_view(&joints);
        assert_eq!(commands.len(), 1);

        let image = skeleton_view(40, 40, &joints);
        // radius 10 around (20, 20)
        assert_eq!(image.get_pixel(20, 20), &Rgb(HEAD_CIRCLE_COLOR));
        assert_eq!(image.get_pixel(29, 20), &Rgb(HEAD_CIRCLE_COLOR));
        assert_eq!(image.get_pixel(35, 35), &Rgb(CANVAS_COLOR));
    }

    #[test]
    fn test_line_stays_inside_image() {
        let mut image = RgbImage::from_pixel(16, 16, Rgb([255, 255, 255]));
        let joints = JointSet::new()
            .with(JointId::LeftShoulder, Joint::new(-50, 8, 1000.0))
            .with(JointId::LeftElbow, Joint::new(80, 8, 1000.0));
        rasterize(&mut image, &connection_commands(&joints));
        assert_eq!(image.get_pixel(8, 8), &Rgb(CONNECTION_COLOR));
    }

    #[test]
    fn test_marker_at_coordinate_limit_is_clipped() {
        let mut image = RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]));
        let joints = JointSet::new()
            .with(JointId::Head, Joint::new(i32::MAX, 0, 1000.0))
            .with(JointId::Center, Joint::new(i32::MIN, i32::MIN, 1000.0));
        overlay(&mut image, &joints, &OverlayStyle::default());
        assert!(image.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_line_between_far_joints_is_clipped() {
        let mut image = RgbImage::from_pixel(16, 16, Rgb([255, 255, 255]));
        let joints = JointSet::new()
            .with(JointId::Head, Joint::new(-1_500_000_000, 8, 1000.0))
            .with(JointId::ShoulderCenter, Joint::new(1_500_000_000, 8, 1000.0));
        overlay(&mut image, &joints, &OverlayStyle::default());
        assert_eq!(image.get_pixel(0, 8), &Rgb(CONNECTION_COLOR));
        assert_eq!(image.get_pixel(8, 8), &Rgb(CONNECTION_COLOR));
        assert_eq!(image.get_pixel(15, 8), &Rgb(CONNECTION_COLOR));
        assert_eq!(image.get_pixel(8, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_line_outside_image_draws_nothing() {
        let mut image = RgbImage::from_pixel(16, 16, Rgb([255, 255, 255]));
        let joints = JointSet::new()
            .with(JointId::Head, Joint::new(i32::MIN, -100, 1000.0))
            .with(JointId::ShoulderCenter, Joint::new(i32::MAX, -100, 1000.0));
        overlay(&mut image, &joints, &OverlayStyle::default());
        assert!(image.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_huge_circle_fills_canvas() {
        let joints = JointSet::new().with(JointId::Head, Joint::new(i32::MAX, i32::MAX, 1e-30));
        let image = skeleton_view(8, 8, &joints);
        assert!(image.pixels().all(|p| *p == Rgb(HEAD_CIRCLE_COLOR)));
    }

    #[test]
    fn test_skeleton_view_paints_head_circle_under_body_lines() {
        let joints = JointSet::new()
            .with(JointId::Head, Joint::new(20, 10, 1000.0))
            .with(JointId::ShoulderCenter, Joint::new(20, 30, 1000.0))
            .with(JointId::Center, Joint::new(20, 50, 1000.0))
            .with(JointId::LeftShoulder, Joint::new(10, 30, 1000.0))
            .with(JointId::LeftElbow, Joint::new(10, 40, 1000.0))
            .with(JointId::LeftHand, Joint::new(10, 55, 3000.0));
        let commands = plan_skeleton_view(&joints);

        let kinds: Vec<&str> = commands
            .iter()
            .map(|c| match c {
                DrawCommand::Line { from, .. } if from.0 == JointId::Head => "neck",
                DrawCommand::Line { .. } => "line",
                DrawCommand::Circle { joint, .. } if *joint == JointId::Head => "head",
                DrawCommand::Circle { .. } => "hand",
                DrawCommand::Marker { .. } => "marker",
            })
            .collect();
        assert_eq!(
            kinds,
            ["neck", "head", "line", "line", "line", "line", "hand"]
        );

        // Head radius 50 covers the shoulder center, the neck line then paints over it
        let image = skeleton_view(40, 60, &joints);
        assert_eq!(image.get_pixel(20, 40), &Rgb(CONNECTION_COLOR));
    }
}

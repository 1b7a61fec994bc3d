// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use depth_replay::constants::{grayscale, overlay, smoothing, threshold};

#[test]
fn test_threshold_limits() {
    // The default window must leave room for the minimum span
    assert!(threshold::DEFAULT_BEGIN + threshold::MIN_SPAN <= threshold::MAX_END);
    assert!(threshold::DEFAULT_STEP > 0);
}

#[test]
fn test_grayscale_scale() {
    assert!(grayscale::DEPTH_SCALE > 0.0);
    assert_eq!(grayscale::BACKGROUND, 255);
}

#[test]
fn test_smoothing_defaults_in_range() {
    assert!((0.0..=1.0).contains(&smoothing::DEFAULT_FACTOR));
    assert!(smoothing::DEFAULT_STEP > 0.0 && smoothing::DEFAULT_STEP < 1.0);
}

#[test]
fn test_head_circle_larger_than_hands() {
    assert!(overlay::HEAD_RADIUS > overlay::HAND_RADIUS);
    assert!(overlay::DEFAULT_POINT_SIZE > 0);
}

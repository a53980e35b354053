#![allow(clippy::float_cmp)]

use super::*;

fn opts() -> ResizeOptions {
    ResizeOptions::default()
}

fn grid_opts(grid: f64) -> ResizeOptions {
    ResizeOptions { grid_size: Some(grid), ..ResizeOptions::default() }
}

// =============================================================
// Resize: basic handle behavior
// =============================================================

#[test]
fn resize_se_grows_both_axes_and_keeps_origin() {
    let start = Bounds::new(100.0, 100.0, 100.0, 100.0);
    let result = resize(
        ResizeHandle::Se,
        start,
        Point::new(230.0, 215.0),
        Point::new(200.0, 200.0),
        &opts(),
    );
    assert_eq!(result, Bounds::new(100.0, 100.0, 130.0, 115.0));
}

#[test]
fn resize_edge_handle_touches_one_axis_only() {
    let start = Bounds::new(0.0, 0.0, 100.0, 50.0);
    let result = resize(
        ResizeHandle::E,
        start,
        Point::new(140.0, 90.0),
        Point::new(100.0, 25.0),
        &opts(),
    );
    assert_eq!(result.width, 140.0);
    assert_eq!(result.height, 50.0);
    assert_eq!((result.x, result.y), (0.0, 0.0));
}

#[test]
fn resize_nw_keeps_opposite_corner_fixed() {
    let start = Bounds::new(100.0, 100.0, 100.0, 100.0);
    let result = resize(
        ResizeHandle::Nw,
        start,
        Point::new(70.0, 60.0),
        Point::new(100.0, 100.0),
        &opts(),
    );
    assert_eq!(result, Bounds::new(70.0, 60.0, 130.0, 140.0));
    // Bottom-right corner unchanged.
    assert_eq!(result.right(), start.right());
    assert_eq!(result.bottom(), start.bottom());
}

#[test]
fn resize_is_seeded_from_drag_start_not_previous_sample() {
    let start = Bounds::new(0.0, 0.0, 100.0, 100.0);
    let start_pointer = Point::new(100.0, 100.0);
    // Two samples of the same drag; the second fully determines the result.
    let _ = resize(ResizeHandle::Se, start, Point::new(180.0, 180.0), start_pointer, &opts());
    let second = resize(ResizeHandle::Se, start, Point::new(120.0, 120.0), start_pointer, &opts());
    assert_eq!(second, Bounds::new(0.0, 0.0, 120.0, 120.0));
}

// =============================================================
// Resize: minimum size clamp
// =============================================================

#[test]
fn resize_clamps_to_minimum_size() {
    let start = Bounds::new(100.0, 100.0, 100.0, 100.0);
    let result = resize(
        ResizeHandle::Se,
        start,
        Point::new(0.0, 0.0),
        Point::new(200.0, 200.0),
        &opts(),
    );
    assert_eq!(result.width, MIN_MODULE_SIZE);
    assert_eq!(result.height, MIN_MODULE_SIZE);
}

#[test]
fn resize_clamp_still_anchors_opposite_corner() {
    let start = Bounds::new(100.0, 100.0, 100.0, 100.0);
    let result = resize(
        ResizeHandle::Nw,
        start,
        Point::new(500.0, 500.0),
        Point::new(100.0, 100.0),
        &opts(),
    );
    assert_eq!(result.width, MIN_MODULE_SIZE);
    assert_eq!(result.height, MIN_MODULE_SIZE);
    assert_eq!(result.right(), start.right());
    assert_eq!(result.bottom(), start.bottom());
}

// =============================================================
// Resize: aspect ratio lock
// =============================================================

#[test]
fn resize_aspect_lock_follows_larger_corner_scale() {
    let start = Bounds::new(0.0, 0.0, 100.0, 50.0);
    let options = ResizeOptions { preserve_aspect_ratio: true, ..opts() };
    // dx implies scale 2.0, dy implies scale 1.2; the larger wins.
    let result = resize(
        ResizeHandle::Se,
        start,
        Point::new(200.0, 60.0),
        Point::new(100.0, 50.0),
        &options,
    );
    assert_eq!(result.width, 200.0);
    assert_eq!(result.height, 100.0);
}

#[test]
fn resize_aspect_lock_edge_handle_tracks_its_own_axis() {
    let start = Bounds::new(0.0, 0.0, 100.0, 50.0);
    let options = ResizeOptions { preserve_aspect_ratio: true, ..opts() };
    let result = resize(
        ResizeHandle::S,
        start,
        Point::new(50.0, 75.0),
        Point::new(50.0, 50.0),
        &options,
    );
    // Height scaled 1.5x, width follows.
    assert_eq!(result.height, 75.0);
    assert_eq!(result.width, 150.0);
}

// =============================================================
// Resize: grid snap
// =============================================================

#[test]
fn resize_snaps_dimensions_to_grid() {
    let start = Bounds::new(100.0, 100.0, 100.0, 100.0);
    let result = resize(
        ResizeHandle::Se,
        start,
        Point::new(263.0, 241.0),
        Point::new(200.0, 200.0),
        &grid_opts(20.0),
    );
    assert_eq!(result.width, 160.0);
    assert_eq!(result.height, 140.0);
    assert_eq!(result.width % 20.0, 0.0);
    assert_eq!(result.height % 20.0, 0.0);
}

#[test]
fn resize_grid_snap_never_collapses_below_minimum() {
    let start = Bounds::new(0.0, 0.0, 100.0, 100.0);
    // Grid larger than the raw clamped size; snapping must not round to 0.
    let result = resize(
        ResizeHandle::Se,
        start,
        Point::new(5.0, 5.0),
        Point::new(100.0, 100.0),
        &grid_opts(50.0),
    );
    assert!(result.width >= MIN_MODULE_SIZE);
    assert!(result.height >= MIN_MODULE_SIZE);
    assert_eq!(result.width % 50.0, 0.0);
    assert_eq!(result.height % 50.0, 0.0);
}

#[test]
fn resize_snaps_position_when_left_or_top_edge_moves() {
    let start = Bounds::new(100.0, 100.0, 100.0, 100.0);
    let result = resize(
        ResizeHandle::Nw,
        start,
        Point::new(67.0, 53.0),
        Point::new(100.0, 100.0),
        &grid_opts(20.0),
    );
    assert_eq!(result.x % 20.0, 0.0);
    assert_eq!(result.y % 20.0, 0.0);
    assert_eq!(result.width % 20.0, 0.0);
    assert_eq!(result.height % 20.0, 0.0);
}

#[test]
fn resize_zero_grid_disables_snapping() {
    let start = Bounds::new(0.0, 0.0, 100.0, 100.0);
    let result = resize(
        ResizeHandle::E,
        start,
        Point::new(133.0, 50.0),
        Point::new(100.0, 50.0),
        &grid_opts(0.0),
    );
    assert_eq!(result.width, 133.0);
}

// =============================================================
// Rotation
// =============================================================

#[test]
fn rotation_follows_screen_convention() {
    let center = Point::new(0.0, 0.0);
    assert_eq!(rotation_from_pointer(center, Point::new(10.0, 0.0), 0.0), 0.0);
    assert_eq!(rotation_from_pointer(center, Point::new(0.0, 10.0), 0.0), 90.0);
    assert_eq!(rotation_from_pointer(center, Point::new(-10.0, 0.0), 0.0), 180.0);
    assert_eq!(rotation_from_pointer(center, Point::new(0.0, -10.0), 0.0), 270.0);
}

#[test]
fn rotation_is_normalized_to_full_turn() {
    let center = Point::new(50.0, 50.0);
    for pointer in [
        Point::new(120.0, 30.0),
        Point::new(-40.0, 90.0),
        Point::new(50.0, -200.0),
    ] {
        let deg = rotation_from_pointer(center, pointer, 0.0);
        assert!((0.0..360.0).contains(&deg), "angle out of range: {deg}");
    }
}

#[test]
fn rotation_snaps_to_angle_multiples() {
    let center = Point::new(0.0, 0.0);
    // atan2(10, 9) is about 48°; snaps down to 45.
    let deg = rotation_from_pointer(center, Point::new(9.0, 10.0), 15.0);
    assert_eq!(deg, 45.0);
    assert_eq!(deg % 15.0, 0.0);
}

#[test]
fn rotation_snap_wraps_to_zero_near_full_turn() {
    let center = Point::new(0.0, 0.0);
    // Just above the x axis approaching from below: ~356°, snaps to 360 → 0.
    let deg = rotation_from_pointer(center, Point::new(100.0, -7.0), 15.0);
    assert_eq!(deg, 0.0);
}

// =============================================================
// Bounding box
// =============================================================

#[test]
fn bounding_box_of_empty_is_zero_rect() {
    assert_eq!(bounding_box_of(&[]), Bounds::default());
}

#[test]
fn bounding_box_of_single_rect_is_identity() {
    let rect = Bounds::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(bounding_box_of(&[rect]), rect);
}

#[test]
fn bounding_box_covers_all_rects() {
    let rects = [
        Bounds::new(0.0, 0.0, 50.0, 50.0),
        Bounds::new(100.0, 30.0, 40.0, 80.0),
        Bounds::new(-20.0, 60.0, 10.0, 10.0),
    ];
    assert_eq!(bounding_box_of(&rects), Bounds::new(-20.0, 0.0, 160.0, 110.0));
}

// =============================================================
// Angle helpers / grid
// =============================================================

#[test]
fn normalize_degrees_360_wraps_values() {
    assert_eq!(normalize_degrees_360(0.0), 0.0);
    assert_eq!(normalize_degrees_360(370.0), 10.0);
    assert_eq!(normalize_degrees_360(-10.0), 350.0);
    assert_eq!(normalize_degrees_360(720.0), 0.0);
}

#[test]
fn signed_angle_delta_picks_shortest_direction() {
    assert_eq!(signed_angle_delta_deg(10.0, 350.0), 20.0);
    assert_eq!(signed_angle_delta_deg(350.0, 10.0), -20.0);
}

#[test]
fn angular_delta_is_symmetric_and_bounded() {
    assert_eq!(angular_delta_deg(10.0, 350.0), 20.0);
    assert_eq!(angular_delta_deg(350.0, 10.0), 20.0);
    assert_eq!(angular_delta_deg(45.0, 45.0), 0.0);
    assert_eq!(angular_delta_deg(725.0, 5.0), 0.0);
}

#[test]
fn snap_point_rounds_to_grid_intersections() {
    assert_eq!(snap_point(Point::new(27.0, 33.0), 20.0), Point::new(20.0, 40.0));
    assert_eq!(snap_point(Point::new(27.0, 33.0), 0.0), Point::new(27.0, 33.0));
}

//! Pure geometry kernel: resize, rotation, and bounding-box math.
//!
//! Everything here is a stateless function over plain values. Drag-style
//! operations take the geometry captured at drag start (`start`,
//! `start_pointer`) rather than the previous sample, so repeated calls during
//! a pointer drag cannot accumulate drift — each sample is recomputed from
//! the same seed.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_MODULE_SIZE;

/// A point in map-local coordinates. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle: top-left corner plus size, in map units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// X coordinate of the right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Y coordinate of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Anchor position for the 8 resize handles (4 corners, 4 edge midpoints).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub fn affects_left(self) -> bool {
        matches!(self, Self::Nw | Self::W | Self::Sw)
    }

    /// Whether dragging this handle moves the right edge.
    #[must_use]
    pub fn affects_right(self) -> bool {
        matches!(self, Self::Ne | Self::E | Self::Se)
    }

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub fn affects_top(self) -> bool {
        matches!(self, Self::Nw | Self::N | Self::Ne)
    }

    /// Whether dragging this handle moves the bottom edge.
    #[must_use]
    pub fn affects_bottom(self) -> bool {
        matches!(self, Self::Sw | Self::S | Self::Se)
    }
}

/// Options applied to a [`resize`] computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOptions {
    /// Minimum width in map units; results are clamped up to this.
    pub min_width: f64,
    /// Minimum height in map units; results are clamped up to this.
    pub min_height: f64,
    /// Grid cell size for snap-to-grid, or `None` for free resizing.
    pub grid_size: Option<f64>,
    /// Lock the result to the starting aspect ratio.
    pub preserve_aspect_ratio: bool,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            min_width: MIN_MODULE_SIZE,
            min_height: MIN_MODULE_SIZE,
            grid_size: None,
            preserve_aspect_ratio: false,
        }
    }
}

/// Compute the result of dragging a resize handle.
///
/// `start` and `start_pointer` are captured once at drag start; `pointer` is
/// the current sample. Corner handles resize both axes, edge handles resize
/// one and hold the other at its starting value. Handles on the top/left side
/// shift the position so the opposite corner stays fixed in space.
///
/// Adjustments are applied in order: raw delta, aspect-ratio lock, minimum
/// size clamp, grid snap. When snapping displaces the position (top/left
/// handles), the position is snapped too. Inputs are never mutated.
#[must_use]
pub fn resize(
    handle: ResizeHandle,
    start: Bounds,
    pointer: Point,
    start_pointer: Point,
    options: &ResizeOptions,
) -> Bounds {
    let dx = pointer.x - start_pointer.x;
    let dy = pointer.y - start_pointer.y;

    let mut width = start.width;
    let mut height = start.height;
    if handle.affects_right() {
        width = start.width + dx;
    } else if handle.affects_left() {
        width = start.width - dx;
    }
    if handle.affects_bottom() {
        height = start.height + dy;
    } else if handle.affects_top() {
        height = start.height - dy;
    }

    if options.preserve_aspect_ratio && start.width > 0.0 && start.height > 0.0 {
        let horizontal = handle.affects_left() || handle.affects_right();
        let vertical = handle.affects_top() || handle.affects_bottom();
        let scale_x = width / start.width;
        let scale_y = height / start.height;
        // Corner drags follow whichever axis the user stretched further;
        // edge drags follow their own axis and the other dimension tracks it.
        let scale = match (horizontal, vertical) {
            (true, true) => scale_x.max(scale_y),
            (true, false) => scale_x,
            _ => scale_y,
        };
        width = start.width * scale;
        height = start.height * scale;
    }

    width = width.max(options.min_width);
    height = height.max(options.min_height);

    if let Some(grid) = effective_grid(options) {
        width = snap_dimension(width, grid, options.min_width);
        height = snap_dimension(height, grid, options.min_height);
    }

    // Re-anchor so the corner opposite the dragged handle stays fixed, using
    // the final size (clamping may have changed it).
    let mut x = start.x;
    let mut y = start.y;
    if handle.affects_left() {
        x = start.right() - width;
    }
    if handle.affects_top() {
        y = start.bottom() - height;
    }

    if let Some(grid) = effective_grid(options) {
        if handle.affects_left() {
            x = snap_value(x, grid);
        }
        if handle.affects_top() {
            y = snap_value(y, grid);
        }
    }

    Bounds { x, y, width, height }
}

/// Compute a rotation angle from the vector `center -> pointer`.
///
/// Uses the screen convention: 0° points right, angles increase clockwise as
/// Y grows downward. The result is normalized to `[0, 360)`. When
/// `snap_angle > 0` the angle is rounded to the nearest multiple of it; a
/// zero or negative step disables snapping.
#[must_use]
pub fn rotation_from_pointer(center: Point, pointer: Point, snap_angle: f64) -> f64 {
    let raw = (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees();
    let mut deg = normalize_degrees_360(raw);
    if snap_angle > 0.0 {
        deg = normalize_degrees_360((deg / snap_angle).round() * snap_angle);
    }
    deg
}

/// Smallest axis-aligned rectangle covering every input rectangle.
///
/// Rotation is deliberately ignored: the envelope is computed from unrotated
/// position/size only, which under-estimates the visual extent of rotated
/// modules. Returns a zero rectangle for empty input rather than an error.
#[must_use]
pub fn bounding_box_of(rects: &[Bounds]) -> Bounds {
    if rects.is_empty() {
        return Bounds::default();
    }
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for rect in rects {
        min_x = min_x.min(rect.x);
        min_y = min_y.min(rect.y);
        max_x = max_x.max(rect.right());
        max_y = max_y.max(rect.bottom());
    }
    Bounds::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Snap a point to the nearest grid intersection.
#[must_use]
pub fn snap_point(point: Point, grid: f64) -> Point {
    if grid <= 0.0 {
        return point;
    }
    Point::new(snap_value(point.x, grid), snap_value(point.y, grid))
}

// ── Angle helpers ───────────────────────────────────────────────

/// Wrap an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees_360(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Signed shortest-path delta from `start` to `current`, in `(-180, 180]`.
#[must_use]
pub fn signed_angle_delta_deg(current: f64, start: f64) -> f64 {
    let delta = current - start;
    if !delta.is_finite() {
        return 0.0;
    }
    let mut wrapped = delta.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped -= 360.0;
    }
    wrapped
}

/// Absolute angular distance between two angles, in `[0, 180]`.
///
/// Handles wraparound, so `angular_delta_deg(350.0, 10.0)` is 20, not 340.
/// Use this (not raw subtraction) whenever comparing stored rotations, which
/// are kept as raw degrees and may sit outside `[0, 360)`.
#[must_use]
pub fn angular_delta_deg(a: f64, b: f64) -> f64 {
    let delta = (a - b).abs().rem_euclid(360.0);
    delta.min(360.0 - delta)
}

// ── Internal ────────────────────────────────────────────────────

fn effective_grid(options: &ResizeOptions) -> Option<f64> {
    options.grid_size.filter(|g| *g > 0.0)
}

/// Snap a dimension to the grid without letting it collapse below `min`.
fn snap_dimension(value: f64, grid: f64, min: f64) -> f64 {
    let snapped = snap_value(value, grid);
    if snapped < min {
        (min / grid).ceil() * grid
    } else {
        snapped
    }
}

fn snap_value(value: f64, grid: f64) -> f64 {
    (value / grid).round() * grid
}

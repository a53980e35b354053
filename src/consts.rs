//! Shared numeric constants for the map editor core.

// ── Geometry ────────────────────────────────────────────────────

/// Minimum width/height of a module in map units. Resizes clamp up to this.
pub const MIN_MODULE_SIZE: f64 = 20.0;

/// Default grid cell size in map units for snap-to-grid editing.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

/// Default rotation snap step in degrees (0 disables snapping).
pub const DEFAULT_SNAP_ANGLE_DEG: f64 = 15.0;

// ── Session ─────────────────────────────────────────────────────

/// Default x/y offset applied to pasted and duplicated modules, in map units.
pub const PASTE_OFFSET: f64 = 20.0;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of snapshots kept on the undo stack.
pub const MAX_HISTORY_SIZE: usize = 50;

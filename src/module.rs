//! Module data model: placed spatial objects and their sparse-update type.
//!
//! A `Module` is one placed object on a campsite map — a pitch, a building, a
//! stretch of road, a utility hookup. The engine treats `metadata` as an
//! opaque per-kind payload: geometry commands carry it through unchanged and
//! never validate its contents.

#[cfg(test)]
#[path = "module_test.rs"]
mod module_test;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::consts::MIN_MODULE_SIZE;
use crate::geometry::{Bounds, Point};

/// Unique identifier for a module.
pub type ModuleId = Uuid;

/// Unique identifier for a map document.
pub type MapId = Uuid;

/// Current wall-clock time in epoch milliseconds.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

/// The kind of infrastructure a module represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// A bookable camping pitch.
    Site,
    /// Sanitary facility (showers, toilets).
    Sanitary,
    /// Parking area.
    Parking,
    /// Reception, shop, or other building.
    Building,
    /// Road or path segment.
    Road,
    /// Drinking-water tap or well.
    WaterSource,
    /// Electrical hookup point.
    PowerHookup,
    /// Waste or grey-water disposal point.
    WasteDisposal,
    /// Playground, pool, or other recreation area.
    Recreation,
    /// Storage unit or shed.
    Storage,
    /// Free-form module with caller-defined metadata.
    Custom,
}

impl ModuleKind {
    /// Whether this kind is a point-like utility hookup.
    #[must_use]
    pub fn is_utility(self) -> bool {
        matches!(self, Self::WaterSource | Self::PowerHookup | Self::WasteDisposal)
    }

    /// Default footprint in map units when placed from the toolbox.
    #[must_use]
    pub fn default_size(self) -> (f64, f64) {
        match self {
            Self::Site => (100.0, 80.0),
            Self::Sanitary | Self::Building | Self::Storage => (80.0, 60.0),
            Self::Parking | Self::Recreation => (120.0, 100.0),
            Self::Road => (200.0, 40.0),
            kind if kind.is_utility() => (MIN_MODULE_SIZE, MIN_MODULE_SIZE),
            _ => (60.0, 60.0),
        }
    }
}

/// A placed spatial object as stored in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Unique identifier, stable for the module's lifetime.
    pub id: ModuleId,
    /// The map this module belongs to.
    pub map_id: MapId,
    /// Infrastructure category.
    pub kind: ModuleKind,
    /// Left edge of the bounding box in map units.
    pub x: f64,
    /// Top edge of the bounding box in map units.
    pub y: f64,
    /// Width in map units; always strictly positive.
    pub width: f64,
    /// Height in map units; always strictly positive.
    pub height: f64,
    /// Clockwise rotation in degrees. Stored raw and unclamped; normalize
    /// with [`crate::geometry::normalize_degrees_360`] before comparing.
    pub rotation: f64,
    /// Stacking order; higher values paint and hit-test first. Uniqueness is
    /// not required — ties resolve by creation order.
    pub z_index: i64,
    /// Locked modules are excluded from interactive mutation.
    pub locked: bool,
    /// Hidden modules are excluded from rendering.
    pub visible: bool,
    /// Opaque per-kind payload; carried through unchanged by every command.
    pub metadata: serde_json::Value,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    /// Last mutation time in epoch milliseconds; refreshed by every command.
    pub updated_at: i64,
}

impl Module {
    /// Create a module with a fresh id and timestamps. The size is clamped up
    /// to the engine minimum so the positive-size invariant holds from birth.
    #[must_use]
    pub fn new(map_id: MapId, kind: ModuleKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        let ts = now_ms();
        Self {
            id: Uuid::new_v4(),
            map_id,
            kind,
            x,
            y,
            width: width.max(MIN_MODULE_SIZE),
            height: height.max(MIN_MODULE_SIZE),
            rotation: 0.0,
            z_index: 0,
            locked: false,
            visible: true,
            metadata: json!({}),
            created_at: ts,
            updated_at: ts,
        }
    }

    /// Create a module using the kind's default toolbox footprint.
    #[must_use]
    pub fn with_default_size(map_id: MapId, kind: ModuleKind, x: f64, y: f64) -> Self {
        let (width, height) = kind.default_size();
        Self::new(map_id, kind, x, y, width, height)
    }

    /// Unrotated bounding rectangle.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    /// Center of the unrotated bounding rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }
}

/// Sparse update for a module. Only present fields are applied.
///
/// `metadata`, when present, replaces the whole payload rather than merging —
/// this keeps property commands exactly invertible: the mirrored old value
/// restores the previous payload byte-for-byte on undo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialModule {
    /// New x position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// New y position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// New width, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// New height, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// New rotation in degrees, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// New z-index, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    /// New locked flag, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// New visible flag, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Replacement metadata payload, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// New last-mutation timestamp, if being updated. Commands set this on
    /// execute and restore the captured value on undo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl PartialModule {
    /// True when no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Update that moves a module to `(x, y)`.
    #[must_use]
    pub fn move_to(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    /// Update that applies a full position/size rectangle.
    #[must_use]
    pub fn resize_to(bounds: Bounds) -> Self {
        Self {
            x: Some(bounds.x),
            y: Some(bounds.y),
            width: Some(bounds.width),
            height: Some(bounds.height),
            ..Self::default()
        }
    }

    /// Update that sets an absolute rotation in degrees.
    #[must_use]
    pub fn rotate_to(degrees: f64) -> Self {
        Self { rotation: Some(degrees), ..Self::default() }
    }

    /// Capture the module's current values for every field present in
    /// `template`, plus `updated_at`. This is the "old" side of a property
    /// delta: applying the result undoes applying `template`.
    #[must_use]
    pub fn mirror_of(module: &Module, template: &Self) -> Self {
        Self {
            x: template.x.map(|_| module.x),
            y: template.y.map(|_| module.y),
            width: template.width.map(|_| module.width),
            height: template.height.map(|_| module.height),
            rotation: template.rotation.map(|_| module.rotation),
            z_index: template.z_index.map(|_| module.z_index),
            locked: template.locked.map(|_| module.locked),
            visible: template.visible.map(|_| module.visible),
            metadata: template.metadata.as_ref().map(|_| module.metadata.clone()),
            updated_at: Some(module.updated_at),
        }
    }

    /// Apply every present field to `module`. Geometry fields land as-is;
    /// size invariants are the caller's concern (commands are built from
    /// kernel output, which already clamps).
    pub fn apply_to(&self, module: &mut Module) {
        if let Some(x) = self.x {
            module.x = x;
        }
        if let Some(y) = self.y {
            module.y = y;
        }
        if let Some(width) = self.width {
            module.width = width;
        }
        if let Some(height) = self.height {
            module.height = height;
        }
        if let Some(rotation) = self.rotation {
            module.rotation = rotation;
        }
        if let Some(z_index) = self.z_index {
            module.z_index = z_index;
        }
        if let Some(locked) = self.locked {
            module.locked = locked;
        }
        if let Some(visible) = self.visible {
            module.visible = visible;
        }
        if let Some(ref metadata) = self.metadata {
            module.metadata = metadata.clone();
        }
        if let Some(updated_at) = self.updated_at {
            module.updated_at = updated_at;
        }
    }
}

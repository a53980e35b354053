//! Geometry and history core for the campsite map editor.
//!
//! This crate owns the editing engine behind the visual map editor: selecting,
//! moving, resizing, rotating, aligning, and duplicating spatial modules
//! (sites, buildings, roads, utilities) placed on a 2D map, with every
//! mutation recorded as a reversible history entry. Rendering, network
//! persistence, and form/dialog UI live in the host application; it drives
//! this engine with map-local pointer coordinates and consumes the resulting
//! document snapshots.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`geometry`] | Pure resize/rotation/bounding-box math and angle helpers |
//! | [`module`] | Module data model and sparse-update type |
//! | [`doc`] | Canonical per-map module collections (`DocumentStore`) |
//! | [`command`] | Reversible edit operations (`EditorCommand`) |
//! | [`history`] | Bounded undo/redo stacks of whole-document snapshots |
//! | [`session`] | Per-session editor state: selection, clipboard, orchestration |
//! | [`consts`] | Shared numeric constants (minimum size, history depth, etc.) |

pub mod command;
pub mod consts;
pub mod doc;
pub mod geometry;
pub mod history;
pub mod module;
pub mod session;

//! Per-session editor state and orchestration.
//!
//! `EditorSession` holds the volatile UI state of one editing session —
//! selection, clipboard, active tool, grid settings, layer visibility — and
//! drives the command/history machinery: commands execute against the
//! document store, then the resulting whole-document snapshot is pushed onto
//! the history manager. Sessions are explicitly constructed service objects;
//! nothing here is global, so several sessions can coexist and each is
//! trivially testable in isolation.
//!
//! Callers are expected to complete one user gesture (a full drag-to-release,
//! one debounced numeric edit) before issuing the next command; the session
//! assumes that discipline rather than enforcing it.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use crate::command::{EditAction, EditorCommand, PropertyChange};
use crate::consts::{DEFAULT_GRID_SIZE, PASTE_OFFSET};
use crate::doc::{DocumentStore, StoreError};
use crate::geometry::{bounding_box_of, snap_point, Point, ResizeOptions};
use crate::history::HistoryManager;
use crate::module::{now_ms, MapId, Module, ModuleId, ModuleKind, PartialModule};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Place a new module of the given kind on click.
    Place(ModuleKind),
}

impl Tool {
    /// Whether this tool creates modules.
    #[must_use]
    pub fn is_placement(self) -> bool {
        matches!(self, Self::Place(_))
    }
}

/// Grid snapping settings for the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSettings {
    /// Whether placement and resize snap to the grid.
    pub snap_enabled: bool,
    /// Grid cell size in map units.
    pub size: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self { snap_enabled: false, size: DEFAULT_GRID_SIZE }
    }
}

/// Alignment target derived from the selection bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    CenterX,
    Right,
    Top,
    CenterY,
    Bottom,
}

impl Alignment {
    fn label(self) -> &'static str {
        match self {
            Self::Left => "align left",
            Self::CenterX => "align horizontal centers",
            Self::Right => "align right",
            Self::Top => "align top",
            Self::CenterY => "align vertical centers",
            Self::Bottom => "align bottom",
        }
    }
}

/// Axis for even distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Volatile editor state for one open document.
#[derive(Debug)]
pub struct EditorSession {
    map_id: MapId,
    selection: HashSet<ModuleId>,
    clipboard: Vec<Module>,
    tool: Tool,
    grid: GridSettings,
    hidden_kinds: HashSet<ModuleKind>,
    history: HistoryManager,
}

impl EditorSession {
    /// Create a session for the given map with default settings and empty
    /// history. Call [`EditorSession::load_document`] to seed the history
    /// baseline once the store holds the map.
    #[must_use]
    pub fn new(map_id: MapId) -> Self {
        Self {
            map_id,
            selection: HashSet::new(),
            clipboard: Vec::new(),
            tool: Tool::default(),
            grid: GridSettings::default(),
            hidden_kinds: HashSet::new(),
            history: HistoryManager::default(),
        }
    }

    /// The map this session is editing.
    #[must_use]
    pub fn map_id(&self) -> MapId {
        self.map_id
    }

    /// Point the session at a (possibly different) map: clears selection and
    /// history, then seeds the history baseline with the current document
    /// state so the first edit is undoable. Clipboard, tool, and grid
    /// settings survive — they are user preferences, not document state.
    pub fn load_document(&mut self, store: &DocumentStore, map_id: MapId) -> Result<(), StoreError> {
        let snapshot = store.snapshot(&map_id)?;
        self.map_id = map_id;
        self.selection.clear();
        self.history.clear();
        self.history.push_state(snapshot, EditAction::DocumentLoad);
        debug!(%map_id, "session loaded document");
        Ok(())
    }

    // ── Selection ───────────────────────────────────────────────

    /// Replace the selection with the given ids.
    pub fn select_modules(&mut self, ids: impl IntoIterator<Item = ModuleId>) {
        self.selection = ids.into_iter().collect();
    }

    /// Empty the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Add the id to the selection, or remove it if already present.
    pub fn toggle_selection(&mut self, id: ModuleId) {
        if !self.selection.insert(id) {
            self.selection.remove(&id);
        }
    }

    /// The raw selection set. Ids are opaque and carry no referential
    /// guarantee — a selected module may have been deleted since. Resolve
    /// through [`EditorSession::selected_modules`] before use.
    #[must_use]
    pub fn selection(&self) -> &HashSet<ModuleId> {
        &self.selection
    }

    /// Whether the id is currently selected.
    #[must_use]
    pub fn is_selected(&self, id: &ModuleId) -> bool {
        self.selection.contains(id)
    }

    /// Resolve the selection against the live document, silently dropping
    /// stale ids. Results come back in deterministic snapshot order.
    #[must_use]
    pub fn selected_modules<'a>(&self, store: &'a DocumentStore) -> Vec<&'a Module> {
        let Some(doc) = store.map(&self.map_id) else {
            return Vec::new();
        };
        let mut modules: Vec<&Module> = self
            .selection
            .iter()
            .filter_map(|id| doc.get(id))
            .collect();
        modules.sort_by(|a, b| {
            a.z_index
                .cmp(&b.z_index)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        modules
    }

    // ── Tool / grid / layers ────────────────────────────────────

    /// Set the active tool.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// The active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Update grid snapping settings.
    pub fn set_grid(&mut self, grid: GridSettings) {
        self.grid = grid;
    }

    /// Current grid snapping settings.
    #[must_use]
    pub fn grid(&self) -> GridSettings {
        self.grid
    }

    /// Kernel resize options derived from the session's grid settings.
    #[must_use]
    pub fn resize_options(&self) -> ResizeOptions {
        ResizeOptions {
            grid_size: self.grid.snap_enabled.then_some(self.grid.size),
            ..ResizeOptions::default()
        }
    }

    /// Show or hide a whole layer of module kinds.
    pub fn set_kind_visible(&mut self, kind: ModuleKind, visible: bool) {
        if visible {
            self.hidden_kinds.remove(&kind);
        } else {
            self.hidden_kinds.insert(kind);
        }
    }

    /// Whether the layer for this kind is visible.
    #[must_use]
    pub fn is_kind_visible(&self, kind: ModuleKind) -> bool {
        !self.hidden_kinds.contains(&kind)
    }

    // ── Clipboard ───────────────────────────────────────────────

    /// Store value-copies of the given modules on the clipboard, replacing
    /// any previous contents. The copies are independent of the live
    /// document.
    pub fn copy_modules(&mut self, modules: &[Module]) {
        self.clipboard = modules.to_vec();
    }

    /// Copy, then delete through a command (locked modules are skipped
    /// entirely — they can be copied but not cut). Pushes one history entry.
    pub fn cut_modules(
        &mut self,
        store: &mut DocumentStore,
        modules: &[Module],
    ) -> Result<(), StoreError> {
        let items: Vec<Module> = modules.iter().filter(|m| !m.locked).cloned().collect();
        if items.is_empty() {
            return Ok(());
        }
        self.clipboard = items.clone();
        let command = EditorCommand::delete(items);
        self.execute(store, command)?;
        Ok(())
    }

    /// Whether the clipboard holds anything.
    #[must_use]
    pub fn clipboard_is_empty(&self) -> bool {
        self.clipboard.is_empty()
    }

    /// Build paste results from the clipboard: fresh ids, positions shifted
    /// by `offset`, relative offsets between entries preserved, timestamps
    /// restamped. The clipboard is not consumed — pasting twice yields two
    /// independent sets. An empty clipboard yields an empty result.
    ///
    /// The returned values are not yet in the document; wrap them in an add
    /// command (see [`EditorCommand::add`]) or pass them to
    /// [`EditorSession::execute`] via one.
    #[must_use]
    pub fn paste_modules(&self, offset: Point) -> Vec<Module> {
        remint(&self.clipboard, self.map_id, offset)
    }

    /// Paste with the conventional one-grid-step offset.
    #[must_use]
    pub fn paste_modules_default(&self) -> Vec<Module> {
        self.paste_modules(Point::new(PASTE_OFFSET, PASTE_OFFSET))
    }

    /// Paste-without-clipboard: same id regeneration and offset semantics,
    /// applied to a caller-supplied module list.
    #[must_use]
    pub fn duplicate_modules(&self, modules: &[Module], offset: Point) -> Vec<Module> {
        remint(modules, self.map_id, offset)
    }

    // ── Placement ───────────────────────────────────────────────

    /// Place a new module at `at` using the active placement tool. Returns
    /// `None` when the active tool does not place modules. The new module is
    /// selected afterwards.
    pub fn place_module(
        &mut self,
        store: &mut DocumentStore,
        at: Point,
    ) -> Result<Option<ModuleId>, StoreError> {
        let Tool::Place(kind) = self.tool else {
            return Ok(None);
        };
        let origin = if self.grid.snap_enabled {
            snap_point(at, self.grid.size)
        } else {
            at
        };
        let module = Module::with_default_size(self.map_id, kind, origin.x, origin.y);
        let command = EditorCommand::add(vec![module]);
        let id = command.module_ids().first().copied();
        self.execute(store, command)?;
        if let Some(id) = id {
            self.select_modules([id]);
        }
        Ok(id)
    }

    // ── Align / distribute ──────────────────────────────────────

    /// Align the selected modules against their shared bounding box.
    ///
    /// Requires at least two resolvable, unlocked modules; otherwise this is
    /// a quiet no-op. Returns whether an edit was applied.
    pub fn align_selection(
        &mut self,
        store: &mut DocumentStore,
        alignment: Alignment,
    ) -> Result<bool, StoreError> {
        let modules = self.editable_selected(store);
        if modules.len() < 2 {
            return Ok(false);
        }
        let rects: Vec<_> = modules.iter().map(Module::bounds).collect();
        let bbox = bounding_box_of(&rects);
        let changes: Vec<PropertyChange> = modules
            .iter()
            .map(|module| {
                let (x, y) = match alignment {
                    Alignment::Left => (bbox.x, module.y),
                    Alignment::CenterX => (bbox.x + (bbox.width - module.width) / 2.0, module.y),
                    Alignment::Right => (bbox.right() - module.width, module.y),
                    Alignment::Top => (module.x, bbox.y),
                    Alignment::CenterY => (module.x, bbox.y + (bbox.height - module.height) / 2.0),
                    Alignment::Bottom => (module.x, bbox.bottom() - module.height),
                };
                PropertyChange::new(module, PartialModule::move_to(x, y))
            })
            .collect();
        self.execute_described(store, EditorCommand::property(changes), alignment.label())
    }

    /// Distribute the selected modules evenly along an axis.
    ///
    /// Requires at least three resolvable, unlocked modules. The outermost
    /// edges stay put; interior modules are spaced with equal gaps computed
    /// from the span minus the summed extents over `count - 1`. Gaps may be
    /// negative when the modules overlap — the math is the same.
    pub fn distribute_selection(
        &mut self,
        store: &mut DocumentStore,
        axis: Axis,
    ) -> Result<bool, StoreError> {
        let mut modules = self.editable_selected(store);
        if modules.len() < 3 {
            return Ok(false);
        }
        let rects: Vec<_> = modules.iter().map(Module::bounds).collect();
        let bbox = bounding_box_of(&rects);
        let count = modules.len();
        let changes: Vec<PropertyChange> = match axis {
            Axis::Horizontal => {
                modules.sort_by(|a, b| a.x.total_cmp(&b.x).then_with(|| a.id.cmp(&b.id)));
                let total: f64 = modules.iter().map(|m| m.width).sum();
                let gap = (bbox.width - total) / (count - 1) as f64;
                let mut cursor = bbox.x;
                modules
                    .iter()
                    .map(|module| {
                        let change =
                            PropertyChange::new(module, PartialModule::move_to(cursor, module.y));
                        cursor += module.width + gap;
                        change
                    })
                    .collect()
            }
            Axis::Vertical => {
                modules.sort_by(|a, b| a.y.total_cmp(&b.y).then_with(|| a.id.cmp(&b.id)));
                let total: f64 = modules.iter().map(|m| m.height).sum();
                let gap = (bbox.height - total) / (count - 1) as f64;
                let mut cursor = bbox.y;
                modules
                    .iter()
                    .map(|module| {
                        let change =
                            PropertyChange::new(module, PartialModule::move_to(module.x, cursor));
                        cursor += module.height + gap;
                        change
                    })
                    .collect()
            }
        };
        let label = match axis {
            Axis::Horizontal => "distribute horizontally",
            Axis::Vertical => "distribute vertically",
        };
        self.execute_described(store, EditorCommand::property(changes), label)
    }

    // ── Command orchestration ───────────────────────────────────

    /// Execute a command and record the resulting document snapshot in
    /// history. No-op commands (zero-delta edits, empty module lists) are
    /// skipped entirely — they neither touch the store nor push history.
    /// Returns whether an edit was applied.
    pub fn execute(
        &mut self,
        store: &mut DocumentStore,
        command: EditorCommand,
    ) -> Result<bool, StoreError> {
        if command.is_noop() {
            debug!(action = command.action().label(), "skipped no-op command");
            return Ok(false);
        }
        command.execute(&self.map_id, store)?;
        let snapshot = store.snapshot(&self.map_id)?;
        self.history.push_state(snapshot, command.action());
        Ok(true)
    }

    /// [`EditorSession::execute`] with a human-readable history description.
    pub fn execute_described(
        &mut self,
        store: &mut DocumentStore,
        command: EditorCommand,
        description: &str,
    ) -> Result<bool, StoreError> {
        if command.is_noop() {
            debug!(description, "skipped no-op command");
            return Ok(false);
        }
        command.execute(&self.map_id, store)?;
        let snapshot = store.snapshot(&self.map_id)?;
        let action = command.action().with_description(description);
        self.history.push_state(snapshot, action);
        Ok(true)
    }

    // ── History bridge ──────────────────────────────────────────

    /// Record a document state directly, without running a command. Used for
    /// edits applied outside the command layer by trusted callers.
    pub fn push_history(&mut self, snapshot: Vec<Module>, action: EditAction) {
        self.history.push_state(snapshot, action);
    }

    /// Step back one history state and restore it into the store. Returns
    /// the restored snapshot, or `None` when there is nothing to undo.
    pub fn undo(&mut self, store: &mut DocumentStore) -> Result<Option<Vec<Module>>, StoreError> {
        let Some(snapshot) = self.history.undo() else {
            return Ok(None);
        };
        store.load_snapshot(&self.map_id, snapshot.clone())?;
        Ok(Some(snapshot))
    }

    /// Step forward one undone state and restore it into the store. Returns
    /// the restored snapshot, or `None` when there is nothing to redo.
    pub fn redo(&mut self, store: &mut DocumentStore) -> Result<Option<Vec<Module>>, StoreError> {
        let Some(snapshot) = self.history.redo() else {
            return Ok(None);
        };
        store.load_snapshot(&self.map_id, snapshot.clone())?;
        Ok(Some(snapshot))
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The action that produced the current state, for UI labels.
    #[must_use]
    pub fn last_action(&self) -> Option<&EditAction> {
        self.history.last_action()
    }

    // ── Internal ────────────────────────────────────────────────

    /// Selection resolved for interactive mutation: stale ids dropped,
    /// locked modules excluded, values cloned out of the store so commands
    /// can mutate it afterwards.
    fn editable_selected(&self, store: &DocumentStore) -> Vec<Module> {
        self.selected_modules(store)
            .into_iter()
            .filter(|m| !m.locked)
            .cloned()
            .collect()
    }
}

/// Value-copy a module list with fresh ids, shifted positions, and restamped
/// timestamps. Relative offsets between entries are preserved because every
/// entry shifts by the same vector.
fn remint(modules: &[Module], map_id: MapId, offset: Point) -> Vec<Module> {
    let ts = now_ms();
    modules
        .iter()
        .map(|source| {
            let mut module = source.clone();
            module.id = Uuid::new_v4();
            module.map_id = map_id;
            module.x += offset.x;
            module.y += offset.y;
            module.created_at = ts;
            module.updated_at = ts;
            module
        })
        .collect()
}

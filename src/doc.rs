//! Canonical document store: per-map module collections.
//!
//! `DocumentStore` is the single owner of live map state. Commands are the
//! only sanctioned mutation path — callers that write to the store directly
//! bypass history capture, and the engine does not detect that. The history
//! manager holds only value snapshots taken at push time, never references
//! into this store.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::module::{MapId, Module, ModuleId, PartialModule};

/// Error returned by store lookups and command execution.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No map with this id exists in the store.
    #[error("map not found: {0}")]
    MapNotFound(MapId),
    /// No module with this id exists in the addressed map.
    #[error("module not found: {0}")]
    ModuleNotFound(ModuleId),
}

/// Map-level metadata: identity, bounds, and display scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMeta {
    /// Unique identifier for this map.
    pub id: MapId,
    /// Display name.
    pub name: String,
    /// Map width in map units.
    pub width: f64,
    /// Map height in map units.
    pub height: f64,
    /// Map units per meter of real campsite ground.
    pub scale: f64,
}

/// One map's module collection. Map-level metadata lives in [`MapMeta`],
/// kept separately in the store.
#[derive(Debug, Clone, Default)]
pub struct MapDocument {
    modules: HashMap<ModuleId, Module>,
}

impl MapDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a module. An existing module with the same `id` is
    /// overwritten.
    pub fn insert(&mut self, module: Module) {
        self.modules.insert(module.id, module);
    }

    /// Remove a module by id, returning it if it was present.
    pub fn remove(&mut self, id: &ModuleId) -> Option<Module> {
        self.modules.remove(id)
    }

    /// Return a reference to a module by id.
    #[must_use]
    pub fn get(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.get(id)
    }

    /// Return a mutable reference to a module by id.
    pub fn get_mut(&mut self, id: &ModuleId) -> Option<&mut Module> {
        self.modules.get_mut(id)
    }

    /// Whether a module with this id exists.
    #[must_use]
    pub fn contains(&self, id: &ModuleId) -> bool {
        self.modules.contains_key(id)
    }

    /// Apply a sparse update to an existing module. Returns false when the
    /// module does not exist.
    pub fn apply_partial(&mut self, id: &ModuleId, partial: &PartialModule) -> bool {
        let Some(module) = self.modules.get_mut(id) else {
            return false;
        };
        partial.apply_to(module);
        true
    }

    /// Full-object update keyed by id. Returns false when no module with the
    /// incoming id exists (unlike [`MapDocument::insert`], this never adds).
    pub fn replace(&mut self, module: Module) -> bool {
        let Some(slot) = self.modules.get_mut(&module.id) else {
            return false;
        };
        *slot = module;
        true
    }

    /// Replace all modules with a full snapshot.
    pub fn load_snapshot(&mut self, modules: Vec<Module>) {
        self.modules.clear();
        for module in modules {
            self.modules.insert(module.id, module);
        }
    }

    /// Value copy of every module in deterministic `(z_index, created_at,
    /// id)` order. Snapshot equality is therefore independent of map-internal
    /// storage order, which makes snapshots usable as history entries.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Module> {
        let mut modules: Vec<Module> = self.modules.values().cloned().collect();
        modules.sort_by(|a, b| {
            a.z_index
                .cmp(&b.z_index)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        modules
    }

    /// All modules sorted by `z_index` descending for the layer panel, ties
    /// broken by creation order.
    #[must_use]
    pub fn sorted_modules(&self) -> Vec<&Module> {
        let mut modules: Vec<&Module> = self.modules.values().collect();
        modules.sort_by(|a, b| {
            b.z_index
                .cmp(&a.z_index)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        modules
    }

    /// Number of modules in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` when the document holds no modules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// In-memory store of map documents, keyed by map id.
#[derive(Debug, Default)]
pub struct DocumentStore {
    metas: HashMap<MapId, MapMeta>,
    docs: HashMap<MapId, MapDocument>,
}

impl DocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty map and return its id.
    pub fn create_map(&mut self, name: &str, width: f64, height: f64, scale: f64) -> MapId {
        let meta = MapMeta {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            width,
            height,
            scale,
        };
        let id = meta.id;
        self.metas.insert(id, meta);
        self.docs.insert(id, MapDocument::new());
        debug!(map_id = %id, "created map");
        id
    }

    /// Map metadata by id.
    #[must_use]
    pub fn meta(&self, map_id: &MapId) -> Option<&MapMeta> {
        self.metas.get(map_id)
    }

    /// Map document by id.
    #[must_use]
    pub fn map(&self, map_id: &MapId) -> Option<&MapDocument> {
        self.docs.get(map_id)
    }

    /// Remove a map and its modules, returning the document if present.
    pub fn remove_map(&mut self, map_id: &MapId) -> Option<MapDocument> {
        self.metas.remove(map_id);
        self.docs.remove(map_id)
    }

    /// Add a module to a map, generating an id when the incoming one is nil.
    /// Returns the effective module id.
    pub fn add_module(&mut self, map_id: &MapId, mut module: Module) -> Result<ModuleId, StoreError> {
        let doc = self.doc_mut(map_id)?;
        if module.id.is_nil() {
            module.id = Uuid::new_v4();
        }
        module.map_id = *map_id;
        let id = module.id;
        doc.insert(module);
        Ok(id)
    }

    /// Remove a module from a map, returning the removed value.
    pub fn remove_module(&mut self, map_id: &MapId, id: &ModuleId) -> Result<Module, StoreError> {
        self.doc_mut(map_id)?
            .remove(id)
            .ok_or(StoreError::ModuleNotFound(*id))
    }

    /// Full-object update keyed by the module's id.
    pub fn update_module(&mut self, map_id: &MapId, module: Module) -> Result<(), StoreError> {
        let id = module.id;
        if self.doc_mut(map_id)?.replace(module) {
            Ok(())
        } else {
            Err(StoreError::ModuleNotFound(id))
        }
    }

    /// Apply a sparse update to a module.
    pub fn apply_partial(
        &mut self,
        map_id: &MapId,
        id: &ModuleId,
        partial: &PartialModule,
    ) -> Result<(), StoreError> {
        if self.doc_mut(map_id)?.apply_partial(id, partial) {
            Ok(())
        } else {
            Err(StoreError::ModuleNotFound(*id))
        }
    }

    /// Look up a module by id across all maps.
    #[must_use]
    pub fn get_module(&self, id: &ModuleId) -> Option<&Module> {
        self.docs.values().find_map(|doc| doc.get(id))
    }

    /// Value snapshot of a map's modules in deterministic order.
    pub fn snapshot(&self, map_id: &MapId) -> Result<Vec<Module>, StoreError> {
        Ok(self.doc(map_id)?.snapshot())
    }

    /// Replace a map's modules with a snapshot (the undo/redo restore path).
    pub fn load_snapshot(&mut self, map_id: &MapId, modules: Vec<Module>) -> Result<(), StoreError> {
        let doc = self.doc_mut(map_id)?;
        doc.load_snapshot(modules);
        debug!(%map_id, count = doc.len(), "loaded map snapshot");
        Ok(())
    }

    /// Modules of a map in layer-panel order (`z_index` descending).
    pub fn modules_by_layer(&self, map_id: &MapId) -> Result<Vec<&Module>, StoreError> {
        Ok(self.doc(map_id)?.sorted_modules())
    }

    fn doc(&self, map_id: &MapId) -> Result<&MapDocument, StoreError> {
        self.docs.get(map_id).ok_or(StoreError::MapNotFound(*map_id))
    }

    fn doc_mut(&mut self, map_id: &MapId) -> Result<&mut MapDocument, StoreError> {
        self.docs.get_mut(map_id).ok_or(StoreError::MapNotFound(*map_id))
    }
}
